mod audio_segment;
mod calibration_profile;
pub mod energy;
mod phrase_detector;
mod request_stage;
mod sanitized_filename;
mod storage_path;
mod transcription_result;
mod upload;

pub use audio_segment::AudioSegment;
pub use calibration_profile::CalibrationProfile;
pub use phrase_detector::{DetectorState, ListenerSettings, PhraseDetector};
pub use request_stage::{RequestStage, StageTransitionError};
pub use sanitized_filename::SanitizedFilename;
pub use storage_path::StoragePath;
pub use transcription_result::{FailureKind, InputProblem, TranscriptionResult};
pub use upload::{UploadId, UploadedFile};
