//! Latin-kit kick drum.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// High-tuned kick at 92 Hz with a 0.6× low layer and a wide click
/// window, closer to a timbale than a bass drum.
#[derive(Debug, Clone)]
pub struct Kick {
    pitch_env: f32,
    amp_env: f32,
    click_env: f32,
    phase: f32,
    low_phase: f32,
    hp_state: f32,
    accent_gain: f32,
    inv_sample_rate: f32,
    triggered: bool,
}

impl Default for Kick {
    fn default() -> Self {
        Self::new()
    }
}

impl Kick {
    const HP_CUTOFF: f32 = 0.28;

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            pitch_env: 0.0,
            amp_env: 0.0,
            click_env: 0.0,
            phase: 0.0,
            low_phase: 0.0,
            hp_state: 0.0,
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
        self.pitch_env = 1.0;
        self.amp_env = 1.0;
        self.click_env = 1.0;
        self.phase = 0.0;
        self.low_phase = 0.0;
        self.hp_state = 0.0;
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

        let pitch_mod = 45.0 * self.pitch_env * self.pitch_env;
        let freq = 92.0 + pitch_mod;

        self.phase += freq * self.inv_sample_rate * TWO_PI;
        if self.phase >= TWO_PI {
            self.phase -= TWO_PI;
        }
        self.low_phase += freq * 0.6 * self.inv_sample_rate * TWO_PI;
        if self.low_phase >= TWO_PI {
            self.low_phase -= TWO_PI;
        }

        let main_sine = fast_sin(self.phase);
        let low_sine = fast_sin(self.low_phase) * 0.4;

        let n = noise.white();
        self.hp_state += (n - self.hp_state) * Self::HP_CUTOFF;
        let hp_noise = n - self.hp_state;
        let click = if self.click_env > 0.7 {
            (self.click_env - 0.7) * 3.33
        } else {
            0.0
        } + hp_noise * 0.1 * self.click_env;

        let output = (main_sine + low_sine + click * 0.4) * self.amp_env;

        self.pitch_env *= 0.9986;
        self.amp_env *= 0.9978;
        self.click_env *= 0.987;

        if self.amp_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * 1.9) * 1.45 * self.accent_gain
    }
}
