mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    CaptureSettings, FrontendSettings, LoggingSettings, MAX_CALIBRATION_WINDOW_SECS,
    MAX_LISTEN_TIMEOUT_SECS, ProviderSettings, ServerSettings, Settings, SpeechProviderSetting,
    StorageSettings,
};
