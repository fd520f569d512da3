use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::{AudioSegment, CalibrationProfile};

/// Somewhere audio comes from for the length of one request.
#[async_trait]
pub trait AudioSource: Send {
    fn sample_rate(&self) -> u32;

    /// The first `duration` of audio, used to estimate ambient noise.
    async fn calibration_window(&mut self, duration: Duration) -> Result<Vec<f32>, CaptureError>;

    /// Produces the segment to transcribe. Sources must give up at `deadline`.
    async fn capture(
        &mut self,
        profile: &CalibrationProfile,
        deadline: Instant,
    ) -> Result<AudioSegment, CaptureError>;
}

/// Opens a fresh live source for every request.
pub trait CaptureDevice: Send + Sync {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("audio input device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("no speech detected before the listening deadline")]
    Timeout,
    #[error("audio input is empty")]
    EmptyInput,
    #[error("audio input could not be decoded: {0}")]
    Undecodable(String),
}
