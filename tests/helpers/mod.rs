use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::mpsc;

use voxscribe::application::ports::{
    AudioSource, CaptureDevice, CaptureError, SpeechProvider, SpeechProviderError,
};
use voxscribe::application::services::{
    CalibrationSettings, NoiseCalibrator, PipelineSettings, TranscriptionClient,
    TranscriptionPipeline,
};
use voxscribe::domain::energy::rms;
use voxscribe::domain::{AudioSegment, CalibrationProfile, ListenerSettings};
use voxscribe::infrastructure::audio::{LiveCapture, SymphoniaAudioDecoder};
use voxscribe::infrastructure::storage::LocalHoldingArea;
use voxscribe::presentation::{AppState, create_router};

pub const TEST_SAMPLE_RATE: u32 = 16_000;
pub const TEST_CHUNK_SIZE: usize = 1024;
pub const MOCK_PROVIDER_NAME: &str = "Mock API";
pub const MOCK_TRANSCRIPT: &str = "hello world";

pub fn tone(seconds: f32, amplitude: f32, sample_rate: u32) -> Vec<f32> {
    let count = (seconds * sample_rate as f32) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
        })
        .collect()
}

pub fn silence(seconds: f32, sample_rate: u32) -> Vec<f32> {
    vec![0.0; (seconds * sample_rate as f32) as usize]
}

pub fn build_wav(sample_rate: u32, channels: u16, samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer
                .write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

pub fn speech_wav() -> Vec<u8> {
    let mut samples = silence(0.5, TEST_SAMPLE_RATE);
    samples.extend(tone(1.0, 0.4, TEST_SAMPLE_RATE));
    samples.extend(silence(0.5, TEST_SAMPLE_RATE));
    build_wav(TEST_SAMPLE_RATE, 1, &samples)
}

pub fn silent_wav() -> Vec<u8> {
    build_wav(TEST_SAMPLE_RATE, 1, &silence(1.5, TEST_SAMPLE_RATE))
}

enum MockBehavior {
    Transcript(String),
    Outage,
    Stall(Duration),
}

/// Answers with a fixed transcript for audible segments and `NoSpeech` for quiet ones.
pub struct MockSpeechProvider {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockSpeechProvider {
    pub fn transcribing(text: &str) -> Self {
        Self::with_behavior(MockBehavior::Transcript(text.to_string()))
    }

    pub fn unavailable() -> Self {
        Self::with_behavior(MockBehavior::Outage)
    }

    pub fn stalling(delay: Duration) -> Self {
        Self::with_behavior(MockBehavior::Stall(delay))
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    fn display_name(&self) -> &str {
        MOCK_PROVIDER_NAME
    }

    async fn recognize(&self, segment: &AudioSegment) -> Result<String, SpeechProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Outage => Err(SpeechProviderError::RequestFailed(
                "connection refused".to_string(),
            )),
            MockBehavior::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(MOCK_TRANSCRIPT.to_string())
            }
            MockBehavior::Transcript(text) => {
                if rms(segment.samples()) < 0.01 {
                    Err(SpeechProviderError::NoSpeech)
                } else {
                    Ok(text.clone())
                }
            }
        }
    }
}

/// Feeds a fixed list of chunks through a real `LiveCapture`.
///
/// With `hold_open` the channel stays open after the script runs out, the way
/// a quiet microphone keeps delivering nothing until the deadline.
pub struct ScriptedCaptureDevice {
    chunks: Vec<Vec<f32>>,
    hold_open: bool,
    open_senders: Mutex<Vec<mpsc::UnboundedSender<Vec<f32>>>>,
    opened: AtomicUsize,
}

impl ScriptedCaptureDevice {
    pub fn new(chunks: Vec<Vec<f32>>, hold_open: bool) -> Self {
        Self {
            chunks,
            hold_open,
            open_senders: Mutex::new(Vec::new()),
            opened: AtomicUsize::new(0),
        }
    }

    /// Faint noise covering the calibration window, a spoken phrase, then a long pause.
    pub fn speaking() -> Self {
        let mut samples = tone(1.2, 0.001, TEST_SAMPLE_RATE);
        samples.extend(tone(0.8, 0.3, TEST_SAMPLE_RATE));
        samples.extend(silence(1.5, TEST_SAMPLE_RATE));
        Self::new(split_chunks(&samples), false)
    }

    /// Ambient noise only, with the stream left open.
    pub fn quiet_room() -> Self {
        Self::new(split_chunks(&silence(1.5, TEST_SAMPLE_RATE)), true)
    }

    pub fn times_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl CaptureDevice for ScriptedCaptureDevice {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in &self.chunks {
            tx.send(chunk.clone()).unwrap();
        }
        if self.hold_open {
            self.open_senders.lock().unwrap().push(tx);
        }
        Ok(Box::new(LiveCapture::new(
            rx,
            TEST_SAMPLE_RATE,
            ListenerSettings::default(),
            TEST_CHUNK_SIZE,
        )))
    }
}

pub struct UnavailableCaptureDevice;

impl CaptureDevice for UnavailableCaptureDevice {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        Err(CaptureError::DeviceUnavailable(
            "no input device in test".to_string(),
        ))
    }
}

/// Blocks in `open()` the way a wedged audio driver does.
pub struct SlowOpeningCaptureDevice {
    pub delay: Duration,
}

impl CaptureDevice for SlowOpeningCaptureDevice {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        std::thread::sleep(self.delay);
        Err(CaptureError::DeviceUnavailable(
            "device answered too late".to_string(),
        ))
    }
}

/// Opens a source that calibrates normally but whose capture never returns,
/// ignoring the deadline it is given.
pub struct StalledCaptureDevice;

impl CaptureDevice for StalledCaptureDevice {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        Ok(Box::new(StalledSource))
    }
}

struct StalledSource;

#[async_trait]
impl AudioSource for StalledSource {
    fn sample_rate(&self) -> u32 {
        TEST_SAMPLE_RATE
    }

    async fn calibration_window(&mut self, duration: Duration) -> Result<Vec<f32>, CaptureError> {
        Ok(silence(duration.as_secs_f32(), TEST_SAMPLE_RATE))
    }

    async fn capture(
        &mut self,
        _profile: &CalibrationProfile,
        _deadline: tokio::time::Instant,
    ) -> Result<AudioSegment, CaptureError> {
        std::future::pending().await
    }
}

pub fn split_chunks(samples: &[f32]) -> Vec<Vec<f32>> {
    samples
        .chunks(TEST_CHUNK_SIZE)
        .map(<[f32]>::to_vec)
        .collect()
}

pub fn test_pipeline_settings() -> PipelineSettings {
    PipelineSettings {
        listen_timeout: Duration::from_millis(500),
        calibration_window_secs: 1.0,
        retain_uploads: false,
    }
}

pub struct TestPipeline {
    pub dir: tempfile::TempDir,
    pub pipeline: Arc<TranscriptionPipeline>,
    pub provider: Arc<MockSpeechProvider>,
}

impl TestPipeline {
    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn create_test_pipeline(
    provider: MockSpeechProvider,
    device: Arc<dyn CaptureDevice>,
    settings: PipelineSettings,
) -> TestPipeline {
    let dir = tempfile::TempDir::new().unwrap();
    let holding_area = Arc::new(LocalHoldingArea::new(dir.path().to_path_buf()).unwrap());
    let provider = Arc::new(provider);
    let client = TranscriptionClient::new(provider.clone(), Duration::from_secs(5));

    let pipeline = TranscriptionPipeline::new(
        device,
        Arc::new(SymphoniaAudioDecoder),
        holding_area,
        NoiseCalibrator::new(CalibrationSettings::default()),
        client,
        settings,
    );

    TestPipeline {
        dir,
        pipeline: Arc::new(pipeline),
        provider,
    }
}

pub fn create_default_pipeline(provider: MockSpeechProvider) -> TestPipeline {
    create_test_pipeline(
        provider,
        Arc::new(ScriptedCaptureDevice::speaking()),
        test_pipeline_settings(),
    )
}

pub fn create_test_router(context: &TestPipeline, max_upload_bytes: usize) -> Router {
    let state = AppState {
        pipeline: Arc::clone(&context.pipeline),
        index_path: context.dir.path().join("missing-index.html"),
        max_upload_bytes,
    };
    create_router(state)
}

pub const BOUNDARY: &str = "voxscribe-test-boundary";

/// A `multipart/form-data` body with one part. `filename: None` omits the attribute.
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, name
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
