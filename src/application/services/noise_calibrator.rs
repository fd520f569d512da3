use std::time::Duration;

use crate::application::ports::{AudioSource, CaptureError};
use crate::domain::CalibrationProfile;
use crate::domain::energy::{adapt_threshold, rms};

/// 300 on the 16-bit scale, expressed for samples normalized to `[-1, 1]`.
pub const DEFAULT_ENERGY_THRESHOLD: f32 = 300.0 / 32_768.0;
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSettings {
    pub energy_threshold: f32,
    pub dynamic_energy_ratio: f32,
    pub adjustment_damping: f32,
    pub chunk_size: usize,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            energy_threshold: DEFAULT_ENERGY_THRESHOLD,
            dynamic_energy_ratio: 1.5,
            adjustment_damping: 0.15,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Estimates the ambient energy level from the start of a source.
///
/// A silent window drives the threshold toward zero, which makes the
/// listener more sensitive rather than failing the request.
pub struct NoiseCalibrator {
    settings: CalibrationSettings,
}

impl NoiseCalibrator {
    pub fn new(settings: CalibrationSettings) -> Self {
        Self { settings }
    }

    pub async fn calibrate(
        &self,
        source: &mut dyn AudioSource,
        window_seconds: f32,
    ) -> Result<CalibrationProfile, CaptureError> {
        // Negative, NaN and out-of-range windows calibrate on nothing.
        let window = Duration::try_from_secs_f32(window_seconds).unwrap_or(Duration::ZERO);
        let samples = source.calibration_window(window).await?;
        Ok(self.profile_from_samples(&samples, source.sample_rate(), window_seconds))
    }

    pub fn profile_from_samples(
        &self,
        samples: &[f32],
        sample_rate: u32,
        window_seconds: f32,
    ) -> CalibrationProfile {
        let rate = sample_rate.max(1) as f32;
        let mut threshold = self.settings.energy_threshold;

        for chunk in samples.chunks(self.settings.chunk_size.max(1)) {
            threshold = adapt_threshold(
                threshold,
                rms(chunk),
                chunk.len() as f32 / rate,
                self.settings.dynamic_energy_ratio,
                self.settings.adjustment_damping,
            );
        }

        tracing::debug!(
            samples = samples.len(),
            noise_threshold = threshold,
            window_seconds,
            "Ambient noise calibrated"
        );

        CalibrationProfile::new(threshold, window_seconds)
    }
}
