use std::time::Duration;

use config::Environment as EnvironmentSource;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::{
    CalibrationSettings, DEFAULT_CHUNK_SIZE, DEFAULT_ENERGY_THRESHOLD, PipelineSettings,
};
use crate::domain::ListenerSettings;

use super::Environment;

/// Longest listening window accepted from configuration.
pub const MAX_LISTEN_TIMEOUT_SECS: u64 = 3_600;
pub const MAX_CALIBRATION_WINDOW_SECS: f32 = 30.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub capture: CaptureSettings,
    pub provider: ProviderSettings,
    pub storage: StorageSettings,
    pub frontend: FrontendSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Defaults, then `appsettings.<env>.toml` if present, then `APP_*` variables
    /// (`APP_PROVIDER__API_KEY` sets `provider.api_key`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::with_name(&environment.config_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values that would break timing arithmetic at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capture = &self.capture;
        if !(1..=MAX_LISTEN_TIMEOUT_SECS).contains(&capture.listen_timeout_secs) {
            return Err(invalid(format!(
                "capture.listen_timeout_secs must be between 1 and {}, got {}",
                MAX_LISTEN_TIMEOUT_SECS, capture.listen_timeout_secs
            )));
        }
        if !(0.0..=MAX_CALIBRATION_WINDOW_SECS).contains(&capture.calibration_window_secs) {
            return Err(invalid(format!(
                "capture.calibration_window_secs must be between 0 and {}, got {}",
                MAX_CALIBRATION_WINDOW_SECS, capture.calibration_window_secs
            )));
        }

        let capture_numbers = [
            ("capture.energy_threshold", capture.energy_threshold),
            ("capture.dynamic_energy_ratio", capture.dynamic_energy_ratio),
            ("capture.adjustment_damping", capture.adjustment_damping),
            ("capture.pause_threshold_secs", capture.pause_threshold_secs),
            ("capture.phrase_threshold_secs", capture.phrase_threshold_secs),
            ("capture.non_speaking_secs", capture.non_speaking_secs),
        ];
        if let Some((name, value)) = capture_numbers
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(invalid(format!(
                "{} must be a finite, non-negative number, got {}",
                name, value
            )));
        }

        if !(1..=MAX_LISTEN_TIMEOUT_SECS).contains(&self.provider.timeout_secs) {
            return Err(invalid(format!(
                "provider.timeout_secs must be between 1 and {}, got {}",
                MAX_LISTEN_TIMEOUT_SECS, self.provider.timeout_secs
            )));
        }
        Ok(())
    }

    pub fn pipeline(&self) -> PipelineSettings {
        PipelineSettings {
            listen_timeout: Duration::from_secs(self.capture.listen_timeout_secs),
            calibration_window_secs: self.capture.calibration_window_secs,
            retain_uploads: self.storage.retain_uploads,
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Message(message)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub listen_timeout_secs: u64,
    pub calibration_window_secs: f32,
    pub energy_threshold: f32,
    pub dynamic_energy: bool,
    pub dynamic_energy_ratio: f32,
    pub adjustment_damping: f32,
    pub pause_threshold_secs: f32,
    pub phrase_threshold_secs: f32,
    pub non_speaking_secs: f32,
    pub chunk_size: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        let listener = ListenerSettings::default();
        Self {
            listen_timeout_secs: 60,
            calibration_window_secs: 1.0,
            energy_threshold: DEFAULT_ENERGY_THRESHOLD,
            dynamic_energy: listener.dynamic_energy,
            dynamic_energy_ratio: listener.dynamic_energy_ratio,
            adjustment_damping: listener.adjustment_damping,
            pause_threshold_secs: listener.pause_threshold_secs,
            phrase_threshold_secs: listener.phrase_threshold_secs,
            non_speaking_secs: listener.non_speaking_secs,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CaptureSettings {
    pub fn listener(&self) -> ListenerSettings {
        ListenerSettings {
            dynamic_energy: self.dynamic_energy,
            dynamic_energy_ratio: self.dynamic_energy_ratio,
            adjustment_damping: self.adjustment_damping,
            pause_threshold_secs: self.pause_threshold_secs,
            phrase_threshold_secs: self.phrase_threshold_secs,
            non_speaking_secs: self.non_speaking_secs,
        }
    }

    pub fn calibration(&self) -> CalibrationSettings {
        CalibrationSettings {
            energy_threshold: self.energy_threshold,
            dynamic_energy_ratio: self.dynamic_energy_ratio,
            adjustment_damping: self.adjustment_damping,
            chunk_size: self.chunk_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProviderSetting {
    #[default]
    Google,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: SpeechProviderSetting,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: SpeechProviderSetting::default(),
            api_key: None,
            base_url: None,
            model: None,
            language: "en-US".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub upload_dir: String,
    pub retain_uploads: bool,
    pub max_upload_mb: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            retain_uploads: false,
            max_upload_mb: 25,
        }
    }
}

impl StorageSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendSettings {
    pub index_path: String,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            index_path: "templates/index.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
