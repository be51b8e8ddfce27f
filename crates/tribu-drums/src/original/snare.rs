//! Original-kit snare drum.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Dual-tone body (220 + 350 Hz) through a one-pole warmth filter, plus
/// a two-stage bandpassed noise buzz with its own slower envelope for
/// the classic wire tail.
#[derive(Debug, Clone)]
pub struct Snare {
    amp_env: f32,
    tone_env: f32,
    buzz_env: f32,
    tone_phase1: f32,
    tone_phase2: f32,
    noise_filter1: f32,
    noise_filter2: f32,
    body_filter: f32,
    accent_gain: f32,
    inv_sample_rate: f32,
    triggered: bool,
}

impl Default for Snare {
    fn default() -> Self {
        Self::new()
    }
}

impl Snare {
    const FREQ1: f32 = 220.0;
    const FREQ2: f32 = 350.0;

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            amp_env: 0.0,
            tone_env: 0.0,
            buzz_env: 0.0,
            tone_phase1: 0.0,
            tone_phase2: 0.0,
            noise_filter1: 0.0,
            noise_filter2: 0.0,
            body_filter: 0.0,
            accent_gain: 1.0,
            inv_sample_rate: 1.0 / 44100.0,
            triggered: false,
        }
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sample_rate = 1.0 / sample_rate.max(8000.0);
    }

    /// Re-arm all envelopes and phases. `accent` in [0, 1] scales the hit.
    pub fn trigger(&mut self, accent: f32) {
        self.amp_env = 1.0;
        self.tone_env = 1.0;
        self.buzz_env = 1.0;
        self.tone_phase1 = 0.0;
        self.tone_phase2 = 0.0;
        self.noise_filter1 = 0.0;
        self.noise_filter2 = 0.0;
        self.body_filter = 0.0;
        self.accent_gain = 0.8 + accent.clamp(0.0, 1.0) * 0.4;
        self.triggered = true;
    }

    /// Stop and clear the voice.
    pub fn reset(&mut self) {
        self.triggered = false;
        self.amp_env = 0.0;
        self.buzz_env = 0.0;
    }

    /// Whether the voice is still sounding.
    pub fn is_active(&self) -> bool {
        self.triggered
    }

    /// Generate one sample, or silence once decayed.
    pub fn process(&mut self, noise: &mut NoiseGenerator) -> f32 {
        if !self.triggered {
            return 0.0;
        }

        self.tone_phase1 += Self::FREQ1 * self.inv_sample_rate * TWO_PI;
        if self.tone_phase1 >= TWO_PI {
            self.tone_phase1 -= TWO_PI;
        }
        self.tone_phase2 += Self::FREQ2 * self.inv_sample_rate * TWO_PI;
        if self.tone_phase2 >= TWO_PI {
            self.tone_phase2 -= TWO_PI;
        }

        let tone1 = fast_sin(self.tone_phase1) * self.tone_env;
        let tone2 = fast_sin(self.tone_phase2) * self.tone_env * 0.6;
        let tone_sum = tone1 + tone2;
        self.body_filter += (tone_sum - self.body_filter) * 0.8;

        let raw = noise.white();
        self.noise_filter1 += (raw - self.noise_filter1) * 0.3;
        self.noise_filter2 += (self.noise_filter1 - self.noise_filter2) * 0.15;
        let buzz = (self.noise_filter1 - self.noise_filter2) * self.buzz_env;

        let output = self.body_filter * 0.5 + buzz * 0.7;

        self.tone_env *= 0.994;
        self.buzz_env *= 0.986;
        self.amp_env *= 0.990;

        if self.amp_env < 0.001 && self.buzz_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * self.amp_env * 1.6) * 1.4 * self.accent_gain
    }
}
