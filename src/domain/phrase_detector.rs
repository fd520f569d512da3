use std::collections::VecDeque;

use super::energy::{adapt_threshold, rms};
use super::{AudioSegment, CalibrationProfile};

/// Tuning for the energy-threshold phrase listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenerSettings {
    pub dynamic_energy: bool,
    pub dynamic_energy_ratio: f32,
    pub adjustment_damping: f32,
    /// Silence after speech that ends a phrase.
    pub pause_threshold_secs: f32,
    /// Minimum speech before a pause may end the phrase; shorter bursts are dropped.
    pub phrase_threshold_secs: f32,
    /// Audio kept on either side of the phrase.
    pub non_speaking_secs: f32,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            dynamic_energy: true,
            dynamic_energy_ratio: 1.5,
            adjustment_damping: 0.15,
            pause_threshold_secs: 0.8,
            phrase_threshold_secs: 0.3,
            non_speaking_secs: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    WaitingForSpeech,
    Recording,
    PhraseComplete,
}

/// Splits a stream of fixed-size chunks into one spoken phrase.
///
/// Chunks are fed in arrival order. While waiting, the threshold keeps
/// tracking the ambient level; once a chunk rises above it the detector
/// records until `pause_threshold_secs` of quiet follow the speech.
pub struct PhraseDetector {
    settings: ListenerSettings,
    sample_rate: u32,
    threshold: f32,
    state: DetectorState,
    frames: VecDeque<Vec<f32>>,
    pause_chunks: usize,
    phrase_chunks: usize,
}

impl PhraseDetector {
    pub fn new(settings: ListenerSettings, profile: &CalibrationProfile, sample_rate: u32) -> Self {
        Self {
            settings,
            sample_rate,
            threshold: profile.noise_threshold,
            state: DetectorState::WaitingForSpeech,
            frames: VecDeque::new(),
            pause_chunks: 0,
            phrase_chunks: 0,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn has_speech(&self) -> bool {
        self.state != DetectorState::WaitingForSpeech
    }

    pub fn feed(&mut self, chunk: &[f32]) -> DetectorState {
        if chunk.is_empty() || self.state == DetectorState::PhraseComplete {
            return self.state;
        }

        let chunk_secs = chunk.len() as f32 / self.sample_rate.max(1) as f32;
        let energy = rms(chunk);
        self.frames.push_back(chunk.to_vec());

        match self.state {
            DetectorState::WaitingForSpeech => {
                let preroll = chunks_for(self.settings.non_speaking_secs, chunk_secs);
                while self.frames.len() > preroll {
                    self.frames.pop_front();
                }

                if energy > self.threshold {
                    tracing::debug!(energy, threshold = self.threshold, "Speech started");
                    self.state = DetectorState::Recording;
                    self.pause_chunks = 0;
                    self.phrase_chunks = 0;
                } else if self.settings.dynamic_energy {
                    self.threshold = adapt_threshold(
                        self.threshold,
                        energy,
                        chunk_secs,
                        self.settings.dynamic_energy_ratio,
                        self.settings.adjustment_damping,
                    );
                }
            }
            DetectorState::Recording => {
                self.phrase_chunks += 1;
                if energy > self.threshold {
                    self.pause_chunks = 0;
                } else {
                    self.pause_chunks += 1;
                }

                if self.pause_chunks > chunks_for(self.settings.pause_threshold_secs, chunk_secs) {
                    let spoken = self.phrase_chunks - self.pause_chunks;
                    if spoken >= chunks_for(self.settings.phrase_threshold_secs, chunk_secs) {
                        self.trim_trailing_silence(chunk_secs);
                        self.state = DetectorState::PhraseComplete;
                    } else {
                        tracing::debug!(spoken_chunks = spoken, "Discarding short noise burst");
                        self.frames.clear();
                        self.state = DetectorState::WaitingForSpeech;
                    }
                }
            }
            DetectorState::PhraseComplete => {}
        }

        self.state
    }

    /// Everything recorded since speech started, or `None` if it never did.
    pub fn into_segment(self) -> Option<AudioSegment> {
        if !self.has_speech() {
            return None;
        }
        let samples: Vec<f32> = self.frames.into_iter().flatten().collect();
        Some(AudioSegment::new(samples, self.sample_rate))
    }

    fn trim_trailing_silence(&mut self, chunk_secs: f32) {
        let keep = chunks_for(self.settings.non_speaking_secs, chunk_secs);
        for _ in 0..self.pause_chunks.saturating_sub(keep) {
            self.frames.pop_back();
        }
    }
}

fn chunks_for(seconds: f32, chunk_secs: f32) -> usize {
    if chunk_secs <= 0.0 {
        return 1;
    }
    ((seconds / chunk_secs).ceil() as usize).max(1)
}
