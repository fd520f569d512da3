use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use voxscribe::application::ports::{AudioSource, CaptureError};
use voxscribe::domain::{CalibrationProfile, ListenerSettings};
use voxscribe::infrastructure::audio::LiveCapture;

const RATE: u32 = 16_000;
const CHUNK: usize = 1024;

fn capture() -> (mpsc::UnboundedSender<Vec<f32>>, LiveCapture) {
    let (tx, rx) = mpsc::unbounded_channel();
    let settings = ListenerSettings {
        dynamic_energy: false,
        ..ListenerSettings::default()
    };
    (tx, LiveCapture::new(rx, RATE, settings, CHUNK))
}

#[tokio::test]
async fn given_irregular_device_blocks_when_reading_calibration_then_rechunks_to_fixed_size() {
    let (tx, mut source) = capture();
    for _ in 0..10 {
        tx.send(vec![0.0; 500]).unwrap();
    }

    let window = source
        .calibration_window(Duration::from_millis(100))
        .await
        .unwrap();

    assert_eq!(window.len(), 2 * CHUNK);
    assert_eq!(source.sample_rate(), RATE);
}

#[tokio::test]
async fn given_phrase_then_pause_when_capturing_then_returns_phrase() {
    let (tx, mut source) = capture();
    for _ in 0..5 {
        tx.send(vec![0.0; CHUNK]).unwrap();
    }
    for _ in 0..10 {
        tx.send(vec![0.3; CHUNK]).unwrap();
    }
    for _ in 0..20 {
        tx.send(vec![0.0; CHUNK]).unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    let segment = source
        .capture(&CalibrationProfile::new(0.01, 1.0), deadline)
        .await
        .unwrap();

    assert!(!segment.is_empty());
    assert!(segment.samples().iter().any(|&s| s > 0.2));
}

#[tokio::test]
async fn given_silence_until_deadline_when_capturing_then_returns_timeout() {
    let (tx, mut source) = capture();
    tx.send(vec![0.0; 4 * CHUNK]).unwrap();

    let deadline = Instant::now() + Duration::from_millis(100);
    let result = source
        .capture(&CalibrationProfile::new(0.01, 1.0), deadline)
        .await;

    assert!(matches!(result, Err(CaptureError::Timeout)));
    drop(tx);
}

#[tokio::test]
async fn given_stream_closes_mid_phrase_when_capturing_then_keeps_partial_audio() {
    let (tx, mut source) = capture();
    for _ in 0..6 {
        tx.send(vec![0.3; CHUNK]).unwrap();
    }
    drop(tx);

    let deadline = Instant::now() + Duration::from_secs(5);
    let segment = source
        .capture(&CalibrationProfile::new(0.01, 1.0), deadline)
        .await
        .unwrap();

    assert_eq!(segment.len(), 6 * CHUNK);
}

#[tokio::test]
async fn given_stream_closes_before_speech_when_capturing_then_reports_device_unavailable() {
    let (tx, mut source) = capture();
    tx.send(vec![0.0; CHUNK]).unwrap();
    drop(tx);

    let deadline = Instant::now() + Duration::from_secs(5);
    let result = source
        .capture(&CalibrationProfile::new(0.01, 1.0), deadline)
        .await;

    assert!(matches!(result, Err(CaptureError::DeviceUnavailable(_))));
}
