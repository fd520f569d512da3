use std::time::Duration;

use voxscribe::presentation::config::{Environment, Settings, SpeechProviderSetting};

#[test]
fn given_defaults_when_loading_settings_then_matches_documented_values() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.provider.kind, SpeechProviderSetting::Google);
    assert_eq!(settings.provider.language, "en-US");
    assert_eq!(settings.storage.upload_dir, "uploads");
    assert!(!settings.storage.retain_uploads);
    assert_eq!(settings.frontend.index_path, "templates/index.html");
}

#[test]
fn given_capture_defaults_when_building_listener_then_uses_standard_thresholds() {
    let settings = Settings::default();

    let listener = settings.capture.listener();

    assert!(listener.dynamic_energy);
    assert_eq!(listener.dynamic_energy_ratio, 1.5);
    assert_eq!(listener.pause_threshold_secs, 0.8);
    assert_eq!(listener.phrase_threshold_secs, 0.3);
    assert_eq!(listener.non_speaking_secs, 0.5);
    assert_eq!(settings.capture.calibration().chunk_size, 1024);
}

#[test]
fn given_defaults_when_building_pipeline_settings_then_uses_one_second_calibration() {
    let pipeline = Settings::default().pipeline();

    assert_eq!(pipeline.listen_timeout, Duration::from_secs(60));
    assert_eq!(pipeline.calibration_window_secs, 1.0);
}

#[test]
fn given_upload_limit_in_megabytes_when_converting_then_returns_bytes() {
    let settings = Settings::default();

    assert_eq!(settings.storage.max_upload_bytes(), 25 * 1024 * 1024);
}

#[test]
fn given_no_settings_file_when_loading_then_falls_back_to_defaults() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.provider.timeout(), Duration::from_secs(30));
    assert_eq!(settings.logging.level, "info");
}

#[test]
fn given_defaults_when_validating_then_accepts_them() {
    assert!(Settings::default().validate().is_ok());
}

#[test]
fn given_infinite_calibration_window_when_validating_then_rejects_setting() {
    let mut settings = Settings::default();
    settings.capture.calibration_window_secs = f32::INFINITY;

    let error = settings.validate().unwrap_err();

    assert!(error.to_string().contains("capture.calibration_window_secs"));
}

#[test]
fn given_negative_calibration_window_when_validating_then_rejects_setting() {
    let mut settings = Settings::default();
    settings.capture.calibration_window_secs = -1.0;

    assert!(settings.validate().is_err());
}

#[test]
fn given_listen_timeout_beyond_maximum_when_validating_then_rejects_setting() {
    let mut settings = Settings::default();
    settings.capture.listen_timeout_secs = u64::MAX;

    let error = settings.validate().unwrap_err();

    assert!(error.to_string().contains("capture.listen_timeout_secs"));
}

#[test]
fn given_zero_listen_timeout_when_validating_then_rejects_setting() {
    let mut settings = Settings::default();
    settings.capture.listen_timeout_secs = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn given_nan_pause_threshold_when_validating_then_names_offending_setting() {
    let mut settings = Settings::default();
    settings.capture.pause_threshold_secs = f32::NAN;

    let error = settings.validate().unwrap_err();

    assert!(error.to_string().contains("capture.pause_threshold_secs"));
}
