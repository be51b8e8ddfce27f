//! Latin-kit snare drum.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Crispy snare: a single bright 280 Hz tone kept low in the mix under
/// three noise layers — highpassed brightness, a bandpassed mid crack,
/// and a smoothed crackle texture tap.
#[derive(Debug, Clone)]
pub struct Snare {
    amp_env: f32,
    tone_env: f32,
    noise_env: f32,
    crackle_env: f32,
    tone_phase: f32,
    highpass: f32,
    bandpass1: f32,
    bandpass2: f32,
    crackle_filter: f32,
    inv_sample_rate: f32,
    triggered: bool,
}

impl Default for Snare {
    fn default() -> Self {
        Self::new()
    }
}

impl Snare {
    const TONE_FREQ: f32 = 280.0;

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            amp_env: 0.0,
            tone_env: 0.0,
            noise_env: 0.0,
            crackle_env: 0.0,
            tone_phase: 0.0,
            highpass: 0.0,
            bandpass1: 0.0,
            bandpass2: 0.0,
            crackle_filter: 0.0,
            inv_sample_rate: 1.0 / 44100.0,
            triggered: false,
        }
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sample_rate = 1.0 / sample_rate.max(8000.0);
    }

    /// Re-arm all envelopes and phases. Accent is ignored by this voice.
    pub fn trigger(&mut self, _accent: f32) {
        self.amp_env = 1.0;
        self.tone_env = 1.0;
        self.noise_env = 1.0;
        self.crackle_env = 1.0;
        self.tone_phase = 0.0;
        self.highpass = 0.0;
        self.bandpass1 = 0.0;
        self.bandpass2 = 0.0;
        self.crackle_filter = 0.0;
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

        self.tone_phase += Self::TONE_FREQ * self.inv_sample_rate * TWO_PI;
        if self.tone_phase >= TWO_PI {
            self.tone_phase -= TWO_PI;
        }
        let tone = fast_sin(self.tone_phase) * self.tone_env;

        let raw = noise.white();
        self.highpass += (raw - self.highpass) * 0.12;
        let bright_noise = (raw - self.highpass) * self.noise_env;

        self.bandpass1 += (bright_noise - self.bandpass1) * 0.2;
        self.bandpass2 += (self.bandpass1 - self.bandpass2) * 0.2;
        let crack_noise = (self.bandpass1 - self.bandpass2) * self.crackle_env;

        self.crackle_filter += (crack_noise - self.crackle_filter) * 0.35;
        let texture = self.crackle_filter;

        let output = tone * 0.25 + bright_noise * 0.5 + crack_noise * 0.7 + texture * 0.3;

        self.tone_env *= 0.995;
        self.noise_env *= 0.988;
        self.crackle_env *= 0.992;
        self.amp_env *= 0.990;

        if self.amp_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * self.amp_env * 2.5) * 1.3
    }
}
