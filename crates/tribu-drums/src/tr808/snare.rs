//! TR-808-style snare drum.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Noise-forward snare: two low tones (330 + 180 Hz) under a
/// bandpass-then-highpass noise chain that dominates the mix.
#[derive(Debug, Clone)]
pub struct Snare {
    amp_env: f32,
    tone_env: f32,
    noise_env: f32,
    tone1_phase: f32,
    tone2_phase: f32,
    bandpass1: f32,
    bandpass2: f32,
    highpass: f32,
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
    const BP_CUTOFF: f32 = 0.17;
    const HP_CUTOFF: f32 = 0.06;
    const FREQ1: f32 = 330.0;
    const FREQ2: f32 = 180.0;

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            amp_env: 0.0,
            tone_env: 0.0,
            noise_env: 0.0,
            tone1_phase: 0.0,
            tone2_phase: 0.0,
            bandpass1: 0.0,
            bandpass2: 0.0,
            highpass: 0.0,
            accent_gain: 0.8,
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
        self.noise_env = 1.0;
        self.tone1_phase = 0.0;
        self.tone2_phase = 0.0;
        self.bandpass1 = 0.0;
        self.bandpass2 = 0.0;
        self.highpass = 0.0;
        self.accent_gain = 0.8 + accent.clamp(0.0, 1.0) * 0.6;
        self.triggered = true;
    }

    /// Stop and clear the voice.
    pub fn reset(&mut self) {
        self.triggered = false;
        self.amp_env = 0.0;
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

        self.tone1_phase += Self::FREQ1 * self.inv_sample_rate * TWO_PI;
        if self.tone1_phase >= TWO_PI {
            self.tone1_phase -= TWO_PI;
        }
        self.tone2_phase += Self::FREQ2 * self.inv_sample_rate * TWO_PI;
        if self.tone2_phase >= TWO_PI {
            self.tone2_phase -= TWO_PI;
        }

        let tone1 = fast_sin(self.tone1_phase) * self.tone_env;
        let tone2 = fast_sin(self.tone2_phase) * self.tone_env * 0.7;
        let tone_sum = tone1 + tone2;

        let raw = noise.white();
        self.bandpass1 += (raw - self.bandpass1) * Self::BP_CUTOFF;
        self.bandpass2 += (self.bandpass1 - self.bandpass2) * Self::BP_CUTOFF;
        let bp_out = self.bandpass1 - self.bandpass2;
        self.highpass += (bp_out - self.highpass) * Self::HP_CUTOFF;
        let filtered_noise = (bp_out - self.highpass) * self.noise_env;

        let output = tone_sum * 0.35 + filtered_noise * 0.85;

        self.tone_env *= 0.993;
        self.noise_env *= 0.9855;
        self.amp_env *= 0.9885;

        if self.amp_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * self.amp_env * 2.1) * 1.5 * self.accent_gain
    }
}
