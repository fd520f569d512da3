use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{SpeechProvider, SpeechProviderError};
use crate::domain::{AudioSegment, FailureKind, TranscriptionResult};

/// Sends one segment to the configured provider and classifies the outcome.
///
/// Immutable after construction; share it behind an `Arc`. Exactly one
/// provider call is made per segment.
pub struct TranscriptionClient {
    provider: Arc<dyn SpeechProvider>,
    timeout: Duration,
}

impl TranscriptionClient {
    pub fn new(provider: Arc<dyn SpeechProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.display_name()
    }

    pub async fn transcribe(&self, segment: AudioSegment) -> TranscriptionResult {
        if segment.is_empty() {
            return TranscriptionResult::failure(FailureKind::Unintelligible);
        }

        tracing::debug!(
            provider = self.provider.display_name(),
            samples = segment.len(),
            duration_secs = segment.duration().as_secs_f32(),
            "Sending segment for recognition"
        );

        let outcome = tokio::time::timeout(self.timeout, self.provider.recognize(&segment)).await;

        match outcome {
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    TranscriptionResult::failure(FailureKind::Unintelligible)
                } else {
                    TranscriptionResult::success(text)
                }
            }
            Ok(Err(SpeechProviderError::NoSpeech)) => {
                TranscriptionResult::failure(FailureKind::Unintelligible)
            }
            Ok(Err(e)) => {
                tracing::error!(
                    provider = self.provider.display_name(),
                    error = %e,
                    "Speech provider call failed"
                );
                TranscriptionResult::failure(FailureKind::ProviderUnavailable)
            }
            Err(_) => {
                tracing::error!(
                    provider = self.provider.display_name(),
                    timeout_secs = self.timeout.as_secs_f32(),
                    "Speech provider call timed out"
                );
                TranscriptionResult::failure(FailureKind::ProviderUnavailable)
            }
        }
    }
}
