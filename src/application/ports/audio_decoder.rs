use crate::domain::AudioSegment;

use super::CaptureError;

/// Turns the bytes of an audio file into mono PCM.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<AudioSegment, CaptureError>;
}
