use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{SpeechProvider, SpeechProviderError};
use crate::domain::AudioSegment;

use super::wav_encoder::encode_l16;

pub const GOOGLE_SPEECH_URL: &str = "http://www.google.com/speech-api/v2/recognize";

/// Google Web Speech API (v2), the endpoint browsers use for dictation.
pub struct GoogleSpeechProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    language: String,
}

impl GoogleSpeechProvider {
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        language: &str,
        timeout: Duration,
    ) -> Result<Self, SpeechProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: base_url.unwrap_or_else(|| GOOGLE_SPEECH_URL.to_string()),
            api_key,
            language: language.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Deserialize)]
struct Alternative {
    transcript: String,
    confidence: Option<f32>,
}

/// The body is one JSON object per line; the first non-empty `result` wins.
/// Within it the scored alternative is preferred over unscored ones.
pub fn parse_recognize_body(body: &str) -> Result<String, SpeechProviderError> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let response: RecognizeResponse = serde_json::from_str(line)
            .map_err(|e| SpeechProviderError::MalformedResponse(e.to_string()))?;

        let Some(result) = response.result.into_iter().next() else {
            continue;
        };

        let best = result
            .alternative
            .iter()
            .find(|alt| alt.confidence.is_some())
            .or_else(|| result.alternative.first());

        return match best {
            Some(alt) if !alt.transcript.trim().is_empty() => Ok(alt.transcript.clone()),
            _ => Err(SpeechProviderError::NoSpeech),
        };
    }

    Err(SpeechProviderError::NoSpeech)
}

#[async_trait]
impl SpeechProvider for GoogleSpeechProvider {
    fn display_name(&self) -> &str {
        "Google API"
    }

    async fn recognize(&self, segment: &AudioSegment) -> Result<String, SpeechProviderError> {
        let body = encode_l16(segment);
        let content_type = format!("audio/l16; rate={}", segment.sample_rate());

        let mut query: Vec<(&str, &str)> =
            vec![("client", "chromium"), ("lang", self.language.as_str())];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            language = %self.language,
            bytes = body.len(),
            "Sending audio to Google speech API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&query)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
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

        let body = response
            .text()
            .await
            .map_err(|e| SpeechProviderError::RequestFailed(format!("body: {}", e)))?;

        let transcript = parse_recognize_body(&body)?;

        tracing::info!(chars = transcript.len(), "Google speech recognition completed");

        Ok(transcript)
    }
}
