use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::application::ports::{AudioSource, CaptureError};
use crate::domain::{AudioSegment, CalibrationProfile};

/// A decoded upload. The whole file is one segment; the calibration window is
/// read without being consumed and the threshold does not shape the result.
pub struct FileCapture {
    segment: Option<AudioSegment>,
    sample_rate: u32,
}

impl FileCapture {
    pub fn new(segment: AudioSegment) -> Self {
        Self {
            sample_rate: segment.sample_rate(),
            segment: Some(segment),
        }
    }
}

#[async_trait]
impl AudioSource for FileCapture {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn calibration_window(&mut self, duration: Duration) -> Result<Vec<f32>, CaptureError> {
        self.segment
            .as_ref()
            .map(|segment| segment.leading(duration).to_vec())
            .ok_or(CaptureError::EmptyInput)
    }

    async fn capture(
        &mut self,
        _profile: &CalibrationProfile,
        _deadline: Instant,
    ) -> Result<AudioSegment, CaptureError> {
        self.segment.take().ok_or(CaptureError::EmptyInput)
    }
}
