/// Ambient-noise estimate for a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProfile {
    pub noise_threshold: f32,
    pub calibration_window_seconds: f32,
}

impl CalibrationProfile {
    pub fn new(noise_threshold: f32, calibration_window_seconds: f32) -> Self {
        Self {
            noise_threshold,
            calibration_window_seconds,
        }
    }

    pub fn is_speech(&self, energy: f32) -> bool {
        energy > self.noise_threshold
    }
}
