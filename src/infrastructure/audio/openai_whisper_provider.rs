use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{SpeechProvider, SpeechProviderError};
use crate::domain::AudioSegment;

use super::wav_encoder::encode_wav;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

/// Any OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct OpenAiWhisperProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    language: Option<String>,
}

impl OpenAiWhisperProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        language: &str,
        timeout: Duration,
    ) -> Result<Self, SpeechProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
            language: iso_639_1(language),
        })
    }
}

/// Whisper takes bare language codes: "en-US" becomes "en".
fn iso_639_1(language: &str) -> Option<String> {
    let primary = language.split(['-', '_']).next().unwrap_or_default().trim();
    (primary.len() == 2).then(|| primary.to_lowercase())
}

#[async_trait]
impl SpeechProvider for OpenAiWhisperProvider {
    fn display_name(&self) -> &str {
        "OpenAI API"
    }

    async fn recognize(&self, segment: &AudioSegment) -> Result<String, SpeechProviderError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let wav = encode_wav(segment).map_err(|e| SpeechProviderError::Encoding(e.to_string()))?;
        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechProviderError::Encoding(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        tracing::debug!(model = %self.model, "Sending audio to OpenAI Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechProviderError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechProviderError::UnexpectedStatus { status, body });
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| SpeechProviderError::RequestFailed(format!("body: {}", e)))?;

        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(SpeechProviderError::NoSpeech);
        }

        tracing::info!(
            chars = transcript.len(),
            "OpenAI Whisper transcription completed"
        );

        Ok(transcript.to_string())
    }
}
