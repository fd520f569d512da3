use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::{Instant, timeout_at};

use crate::application::ports::{
    AudioDecoder, AudioSource, CaptureDevice, CaptureError, HoldingArea, HoldingAreaError,
};
use crate::domain::{
    AudioSegment, FailureKind, InputProblem, RequestStage, SanitizedFilename, StoragePath,
    TranscriptionResult, UploadId, UploadedFile,
};

use super::file_capture::FileCapture;
use super::noise_calibrator::NoiseCalibrator;
use super::transcription_client::TranscriptionClient;

// Sources enforce the deadline themselves; this only catches ones that don't.
const CAPTURE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub listen_timeout: Duration,
    pub calibration_window_secs: f32,
    pub retain_uploads: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(60),
            calibration_window_secs: 1.0,
            retain_uploads: false,
        }
    }
}

/// The `file` part of an upload request as it arrived.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub original_name: Option<String>,
    pub data: Bytes,
}

/// Runs one request through capture, calibration and transcription.
///
/// Holds no per-request state; every call builds its own source,
/// calibration profile and segment.
pub struct TranscriptionPipeline {
    capture_device: Arc<dyn CaptureDevice>,
    decoder: Arc<dyn AudioDecoder>,
    holding_area: Arc<dyn HoldingArea>,
    calibrator: NoiseCalibrator,
    client: TranscriptionClient,
    settings: PipelineSettings,
}

impl TranscriptionPipeline {
    pub fn new(
        capture_device: Arc<dyn CaptureDevice>,
        decoder: Arc<dyn AudioDecoder>,
        holding_area: Arc<dyn HoldingArea>,
        calibrator: NoiseCalibrator,
        client: TranscriptionClient,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            capture_device,
            decoder,
            holding_area,
            calibrator,
            client,
            settings,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle_live_record(&self) -> TranscriptionResult {
        let mut tracker = StageTracker::new("record");
        let deadline = Instant::now() + self.settings.listen_timeout;

        tracker.advance(RequestStage::Capturing);
        let device = Arc::clone(&self.capture_device);
        let opening = tokio::task::spawn_blocking(move || device.open());
        let mut source = match timeout_at(deadline + CAPTURE_GRACE, opening).await {
            Ok(Ok(Ok(source))) => source,
            Ok(Ok(Err(e))) => {
                tracing::error!(error = %e, "Could not open capture device");
                return tracker.finish(TranscriptionResult::failure(capture_failure(e)));
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Capture device task panicked");
                return tracker.finish(TranscriptionResult::failure(
                    FailureKind::DeviceUnavailable,
                ));
            }
            Err(_) => {
                // The blocking open keeps its thread; whatever it returns is dropped.
                tracing::warn!("Capture device did not open before the listening deadline");
                return tracker.finish(TranscriptionResult::failure(FailureKind::Timeout));
            }
        };

        tracker.advance(RequestStage::Calibrating);
        tracing::info!("Listening");
        let captured = self.calibrate_and_capture(source.as_mut(), deadline).await;
        drop(source);

        let segment = match captured {
            Ok(segment) => segment,
            Err(kind) => return tracker.finish(TranscriptionResult::failure(kind)),
        };

        tracker.advance(RequestStage::Transcribing);
        let result = self.client.transcribe(segment).await;
        tracker.finish(result)
    }

    #[tracing::instrument(skip(self, upload))]
    pub async fn handle_upload(&self, upload: Option<AudioUpload>) -> TranscriptionResult {
        let mut tracker = StageTracker::new("upload");

        let Some(upload) = upload else {
            return tracker.finish(invalid_input(InputProblem::MissingFile));
        };
        let original_name = match upload.original_name {
            Some(name) if !name.is_empty() => name,
            _ => return tracker.finish(invalid_input(InputProblem::EmptyFilename)),
        };
        if upload.data.is_empty() {
            return tracker.finish(invalid_input(InputProblem::EmptyFile));
        }

        let deadline = Instant::now() + self.settings.listen_timeout;

        tracker.advance(RequestStage::Capturing);
        let held = match self.hold(original_name, upload.data).await {
            Ok(held) => held,
            Err(e) => {
                tracing::error!(error = %e, "Failed to store upload");
                return tracker.finish(TranscriptionResult::failure(
                    FailureKind::StorageUnavailable,
                ));
            }
        };

        let result = self.transcribe_held(&mut tracker, held.file(), deadline).await;
        held.release().await;
        tracker.finish(result)
    }

    async fn hold(&self, original_name: String, data: Bytes) -> Result<HeldUpload, HoldingAreaError> {
        let id = UploadId::new();
        let filename = SanitizedFilename::new(&original_name);
        let storage_path = StoragePath::new(&id, &filename);

        let size_bytes = self.holding_area.persist(&storage_path, data).await?;

        let file = UploadedFile {
            id,
            original_name,
            stored_path: self.holding_area.resolve(&storage_path),
            storage_path,
            size_bytes,
        };

        tracing::info!(
            upload_id = %file.id.as_uuid(),
            stored_as = %file.storage_path,
            size_bytes,
            "Upload stored"
        );

        Ok(HeldUpload::new(
            Arc::clone(&self.holding_area),
            file,
            self.settings.retain_uploads,
        ))
    }

    async fn transcribe_held(
        &self,
        tracker: &mut StageTracker,
        file: &UploadedFile,
        deadline: Instant,
    ) -> TranscriptionResult {
        let data = match self.holding_area.fetch(&file.storage_path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, stored_as = %file.storage_path, "Failed to read upload");
                return TranscriptionResult::failure(FailureKind::StorageUnavailable);
            }
        };

        let decoder = Arc::clone(&self.decoder);
        let segment = match tokio::task::spawn_blocking(move || decoder.decode(&data)).await {
            Ok(Ok(segment)) => segment,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, stored_as = %file.storage_path, "Upload is not usable audio");
                return TranscriptionResult::failure(capture_failure(e));
            }
            Err(e) => {
                tracing::error!(error = %e, "Decoder task panicked");
                return invalid_input(InputProblem::UndecodableAudio);
            }
        };

        let mut source = FileCapture::new(segment);

        tracker.advance(RequestStage::Calibrating);
        let segment = match self.calibrate_and_capture(&mut source, deadline).await {
            Ok(segment) => segment,
            Err(kind) => return TranscriptionResult::failure(kind),
        };

        tracker.advance(RequestStage::Transcribing);
        self.client.transcribe(segment).await
    }

    async fn calibrate_and_capture(
        &self,
        source: &mut dyn AudioSource,
        deadline: Instant,
    ) -> Result<AudioSegment, FailureKind> {
        let hard_stop = deadline + CAPTURE_GRACE;

        let calibration = self
            .calibrator
            .calibrate(&mut *source, self.settings.calibration_window_secs);
        let profile = match timeout_at(hard_stop, calibration).await {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Calibration failed");
                return Err(capture_failure(e));
            }
            Err(_) => return Err(FailureKind::Timeout),
        };

        match timeout_at(hard_stop, source.capture(&profile, deadline)).await {
            Ok(Ok(segment)) => {
                tracing::debug!(
                    samples = segment.len(),
                    duration_secs = segment.duration().as_secs_f32(),
                    "Segment captured"
                );
                Ok(segment)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Capture failed");
                Err(capture_failure(e))
            }
            Err(_) => {
                tracing::warn!("Audio source overran the listening deadline");
                Err(FailureKind::Timeout)
            }
        }
    }
}

fn capture_failure(error: CaptureError) -> FailureKind {
    match error {
        CaptureError::DeviceUnavailable(_) => FailureKind::DeviceUnavailable,
        CaptureError::Timeout => FailureKind::Timeout,
        CaptureError::EmptyInput => FailureKind::InvalidInput(InputProblem::EmptyFile),
        CaptureError::Undecodable(_) => FailureKind::InvalidInput(InputProblem::UndecodableAudio),
    }
}

fn invalid_input(problem: InputProblem) -> TranscriptionResult {
    TranscriptionResult::failure(FailureKind::InvalidInput(problem))
}

struct StageTracker {
    request: &'static str,
    stage: RequestStage,
}

impl StageTracker {
    fn new(request: &'static str) -> Self {
        tracing::debug!(request, stage = %RequestStage::Received, "Request received");
        Self {
            request,
            stage: RequestStage::Received,
        }
    }

    fn advance(&mut self, next: RequestStage) {
        match self.stage.advance(next) {
            Ok(stage) => {
                self.stage = stage;
                tracing::debug!(request = self.request, stage = %stage, "Request stage changed");
            }
            Err(e) => tracing::warn!(request = self.request, error = %e, "Stage change ignored"),
        }
    }

    fn finish(&mut self, result: TranscriptionResult) -> TranscriptionResult {
        match &result {
            TranscriptionResult::Success { text } => {
                self.advance(RequestStage::Completed);
                tracing::info!(request = self.request, chars = text.len(), "Transcription completed");
            }
            TranscriptionResult::Failure { kind } => {
                self.advance(RequestStage::Failed);
                tracing::warn!(request = self.request, kind = %kind, "Transcription failed");
            }
        }
        result
    }
}

/// Stored upload that is removed once the request is done with it,
/// including when the request future is dropped early.
struct HeldUpload {
    holding_area: Arc<dyn HoldingArea>,
    file: UploadedFile,
    retain: bool,
    released: bool,
}

impl HeldUpload {
    fn new(holding_area: Arc<dyn HoldingArea>, file: UploadedFile, retain: bool) -> Self {
        Self {
            holding_area,
            file,
            retain,
            released: false,
        }
    }

    fn file(&self) -> &UploadedFile {
        &self.file
    }

    async fn release(mut self) {
        self.released = true;
        if self.retain {
            return;
        }
        match self.holding_area.remove(&self.file.storage_path).await {
            Ok(()) => tracing::debug!(stored_as = %self.file.storage_path, "Upload removed"),
            Err(e) => tracing::warn!(error = %e, stored_as = %self.file.storage_path, "Failed to remove upload"),
        }
    }
}

impl Drop for HeldUpload {
    fn drop(&mut self) {
        if self.released || self.retain {
            return;
        }
        let holding_area = Arc::clone(&self.holding_area);
        let path = self.file.storage_path.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = holding_area.remove(&path).await {
                    tracing::warn!(error = %e, stored_as = %path, "Failed to remove abandoned upload");
                }
            });
        }
    }
}
