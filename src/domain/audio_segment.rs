use std::time::Duration;

/// Mono PCM samples in `[-1.0, 1.0]` treated as one transcription unit.
#[derive(Debug, PartialEq)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Leading samples covering at most `duration`.
    pub fn leading(&self, duration: Duration) -> &[f32] {
        let wanted = (duration.as_secs_f64() * self.sample_rate as f64).round() as usize;
        &self.samples[..wanted.min(self.samples.len())]
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
