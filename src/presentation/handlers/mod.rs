mod health;
mod index;
mod record;
mod transcription_response;
mod upload;

pub use health::health_handler;
pub use index::index_handler;
pub use record::record_handler;
pub use transcription_response::{
    ErrorResponse, TranscriptResponse, error_response, failure_message, failure_status,
    transcription_response,
};
pub use upload::{FILE_FIELD, upload_handler};
