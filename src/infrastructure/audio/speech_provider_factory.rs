use std::sync::Arc;

use crate::application::ports::{SpeechProvider, SpeechProviderError};
use crate::presentation::config::{ProviderSettings, SpeechProviderSetting};

use super::google_speech_provider::GoogleSpeechProvider;
use super::openai_whisper_provider::OpenAiWhisperProvider;

pub struct SpeechProviderFactory;

impl SpeechProviderFactory {
    pub fn create(
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn SpeechProvider>, SpeechProviderError> {
        match settings.kind {
            SpeechProviderSetting::Google => {
                // The public endpoint rejects keyless requests; a custom base_url may not.
                if settings.api_key.is_none() && settings.base_url.is_none() {
                    return Err(SpeechProviderError::Configuration(
                        "API key required for the Google speech endpoint (set APP_PROVIDER__API_KEY)"
                            .to_string(),
                    ));
                }
                let provider = GoogleSpeechProvider::new(
                    settings.base_url.clone(),
                    settings.api_key.clone(),
                    &settings.language,
                    settings.timeout(),
                )?;
                Ok(Arc::new(provider))
            }
            SpeechProviderSetting::OpenAi => {
                let key = settings.api_key.clone().ok_or_else(|| {
                    SpeechProviderError::Configuration(
                        "API key required for OpenAI Whisper".to_string(),
                    )
                })?;
                let provider = OpenAiWhisperProvider::new(
                    key,
                    settings.base_url.clone(),
                    settings.model.clone(),
                    &settings.language,
                    settings.timeout(),
                )?;
                Ok(Arc::new(provider))
            }
        }
    }
}
