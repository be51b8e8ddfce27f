//! TR-808-style kick drum.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Long boomy kick: 60 Hz base with a cubed pitch envelope for the
/// characteristic fast initial drop, squared amplitude envelope, and a
/// short click transient.
#[derive(Debug, Clone)]
pub struct Kick {
    pitch_env: f32,
    amp_env: f32,
    click_env: f32,
    phase: f32,
    sub_phase: f32,
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
    const HP_CUTOFF: f32 = 0.25;

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            pitch_env: 0.0,
            amp_env: 0.0,
            click_env: 0.0,
            phase: 0.0,
            sub_phase: 0.0,
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
        self.sub_phase = 0.0;
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

        let pitch_mod = 60.0 * self.pitch_env * self.pitch_env * self.pitch_env;
        let freq = 60.0 + pitch_mod;

        self.phase += freq * self.inv_sample_rate * TWO_PI;
        if self.phase >= TWO_PI {
            self.phase -= TWO_PI;
        }
        self.sub_phase += freq * 0.5 * self.inv_sample_rate * TWO_PI;
        if self.sub_phase >= TWO_PI {
            self.sub_phase -= TWO_PI;
        }

        let main_sine = fast_sin(self.phase);
        let sub_sine = fast_sin(self.sub_phase) * 0.6;

        let n = noise.white();
        self.hp_state += (n - self.hp_state) * Self::HP_CUTOFF;
        let hp_noise = n - self.hp_state;
        let click = if self.click_env > 0.8 {
            (self.click_env - 0.8) * 5.0
        } else {
            0.0
        } + hp_noise * 0.08 * self.click_env;

        let output = (main_sine + sub_sine + click * 0.3) * self.amp_env * self.amp_env;

        self.pitch_env *= 0.9992;
        self.amp_env *= 0.9986;
        self.click_env *= 0.9915;

        if self.amp_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * 1.55) * 2.0 * self.accent_gain
    }
}
