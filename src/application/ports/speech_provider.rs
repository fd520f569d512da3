use async_trait::async_trait;

use crate::domain::AudioSegment;

/// Remote speech-to-text service.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Human-readable name used in error messages, e.g. "Google API".
    fn display_name(&self) -> &str;

    async fn recognize(&self, segment: &AudioSegment) -> Result<String, SpeechProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechProviderError {
    #[error("provider found no speech in the audio")]
    NoSpeech,
    #[error("audio encoding failed: {0}")]
    Encoding(String),
    #[error("api request failed: {0}")]
    RequestFailed(String),
    #[error("api returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("malformed api response: {0}")]
    MalformedResponse(String),
    #[error("provider misconfigured: {0}")]
    Configuration(String),
}
