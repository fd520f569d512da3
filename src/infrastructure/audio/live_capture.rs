use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

use crate::application::ports::{AudioSource, CaptureDevice, CaptureError};
use crate::domain::{
    AudioSegment, CalibrationProfile, DetectorState, ListenerSettings, PhraseDetector,
};

/// The host's default input device, opened fresh for each request.
pub struct CpalCaptureDevice {
    listener: ListenerSettings,
    chunk_size: usize,
}

impl CpalCaptureDevice {
    pub fn new(listener: ListenerSettings, chunk_size: usize) -> Self {
        Self {
            listener,
            chunk_size,
        }
    }
}

impl CaptureDevice for CpalCaptureDevice {
    /// Blocks until the device is streaming or has failed to start.
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        // cpal streams are !Send on some hosts, so the stream lives and dies on this thread.
        thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || run_device(chunk_tx, ready_tx, stop_rx))
            .map_err(|e| CaptureError::DeviceUnavailable(format!("capture thread: {}", e)))?;

        let sample_rate = ready_rx.recv().map_err(|_| {
            CaptureError::DeviceUnavailable("capture thread exited early".to_string())
        })??;

        let capture = LiveCapture::new(chunk_rx, sample_rate, self.listener, self.chunk_size)
            .with_stop_signal(stop_tx);
        Ok(Box::new(capture))
    }
}

fn run_device(
    chunk_tx: mpsc::UnboundedSender<Vec<f32>>,
    ready_tx: std_mpsc::SyncSender<Result<u32, CaptureError>>,
    stop_rx: std_mpsc::Receiver<()>,
) {
    let stream = match start_stream(chunk_tx) {
        Ok((stream, sample_rate)) => {
            let _ = ready_tx.send(Ok(sample_rate));
            stream
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    // Returns once the owning LiveCapture drops its sender.
    let _ = stop_rx.recv();
    drop(stream);
    tracing::debug!("Capture stream closed");
}

fn start_stream(
    chunk_tx: mpsc::UnboundedSender<Vec<f32>>,
) -> Result<(Stream, u32), CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::DeviceUnavailable("no default input device".to_string()))?;
    let name = device.name().unwrap_or_else(|_| "unknown".to_string());

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::DeviceUnavailable(format!("input config: {}", e)))?;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.into();
    let sample_rate = config.sample_rate.0;

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, chunk_tx)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, chunk_tx)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, chunk_tx)?,
        other => {
            return Err(CaptureError::DeviceUnavailable(format!(
                "unsupported sample format: {:?}",
                other
            )));
        }
    };

    stream
        .play()
        .map_err(|e| CaptureError::DeviceUnavailable(format!("play: {}", e)))?;

    tracing::info!(
        device = %name,
        sample_rate,
        channels = config.channels,
        "Capture stream started"
    );

    Ok((stream, sample_rate))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    chunk_tx: mpsc::UnboundedSender<Vec<f32>>,
) -> Result<Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels.max(1) as usize;
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // Receiver gone means the request finished; nothing to do.
                let _ = chunk_tx.send(downmix(data, channels));
            },
            |err| tracing::error!(error = %err, "Capture stream error"),
            None,
        )
        .map_err(|e| CaptureError::DeviceUnavailable(format!("stream build: {}", e)))
}

fn downmix<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: Sample,
    f32: FromSample<T>,
{
    data.chunks(channels)
        .map(|frame| frame.iter().map(|&s| s.to_sample::<f32>()).sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Live microphone audio arriving as mono chunks over a channel.
///
/// Incoming blocks are re-cut to `chunk_size` samples so the phrase
/// detector always sees uniform chunks.
pub struct LiveCapture {
    receiver: mpsc::UnboundedReceiver<Vec<f32>>,
    sample_rate: u32,
    listener: ListenerSettings,
    chunk_size: usize,
    pending: Vec<f32>,
    _stop: Option<std_mpsc::Sender<()>>,
}

impl LiveCapture {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Vec<f32>>,
        sample_rate: u32,
        listener: ListenerSettings,
        chunk_size: usize,
    ) -> Self {
        Self {
            receiver,
            sample_rate,
            listener,
            chunk_size: chunk_size.max(1),
            pending: Vec::new(),
            _stop: None,
        }
    }

    fn with_stop_signal(mut self, stop: std_mpsc::Sender<()>) -> Self {
        self._stop = Some(stop);
        self
    }

    async fn next_chunk(&mut self) -> Result<Vec<f32>, CaptureError> {
        while self.pending.len() < self.chunk_size {
            match self.receiver.recv().await {
                Some(samples) => self.pending.extend(samples),
                None => {
                    return Err(CaptureError::DeviceUnavailable(
                        "capture stream closed".to_string(),
                    ));
                }
            }
        }
        let rest = self.pending.split_off(self.chunk_size);
        Ok(std::mem::replace(&mut self.pending, rest))
    }
}

#[async_trait]
impl AudioSource for LiveCapture {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn calibration_window(&mut self, duration: Duration) -> Result<Vec<f32>, CaptureError> {
        let wanted = (duration.as_secs_f64() * self.sample_rate as f64).round() as usize;
        let mut samples = Vec::with_capacity(wanted);
        while samples.len() < wanted {
            samples.extend(self.next_chunk().await?);
        }
        Ok(samples)
    }

    async fn capture(
        &mut self,
        profile: &CalibrationProfile,
        deadline: Instant,
    ) -> Result<AudioSegment, CaptureError> {
        let mut detector = PhraseDetector::new(self.listener, profile, self.sample_rate);

        loop {
            match timeout_at(deadline, self.next_chunk()).await {
                Ok(Ok(chunk)) => {
                    if detector.feed(&chunk) == DetectorState::PhraseComplete {
                        break;
                    }
                }
                Ok(Err(e)) if !detector.has_speech() => return Err(e),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Capture ended mid-phrase; keeping partial audio");
                    break;
                }
                Err(_) => {
                    tracing::debug!(
                        has_speech = detector.has_speech(),
                        "Listening deadline reached"
                    );
                    break;
                }
            }
        }

        detector.into_segment().ok_or(CaptureError::Timeout)
    }
}
