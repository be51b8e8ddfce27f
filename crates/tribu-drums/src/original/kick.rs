//! Original-kit kick drum.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Sine-body kick with a half-frequency sub layer, a filtered-noise
/// click transient, and a touch of per-sample analog drift on both the
/// pitch and the amplitude decay.
#[derive(Debug, Clone)]
pub struct Kick {
    pitch_env: f32,
    amp_env: f32,
    sub_env: f32,
    click_env: f32,
    phase: f32,
    sub_phase: f32,
    hp_noise_state: f32,
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
            sub_env: 0.0,
            click_env: 0.0,
            phase: 0.0,
            sub_phase: 0.0,
            hp_noise_state: 0.0,
            accent_gain: 0.75,
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
        self.sub_env = 1.0;
        self.click_env = 1.0;
        self.phase = 0.0;
        self.sub_phase = 0.0;
        self.hp_noise_state = 0.0;
        self.accent_gain = 0.75 + accent.clamp(0.0, 1.0) * 0.5;
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

        let pitch_mod = 110.0 * self.pitch_env * self.pitch_env;
        let freq = 58.0 + pitch_mod;

        let drift = 1.0 + noise.white() * 0.002;
        self.phase += freq * drift * self.inv_sample_rate * TWO_PI;
        if self.phase >= TWO_PI {
            self.phase -= TWO_PI;
        }
        self.sub_phase += freq * 0.5 * self.inv_sample_rate * TWO_PI;
        if self.sub_phase >= TWO_PI {
            self.sub_phase -= TWO_PI;
        }

        let main_sine = fast_sin(self.phase);
        let sub_sine = fast_sin(self.sub_phase) * self.sub_env * 0.8;

        let n = noise.white();
        self.hp_noise_state += (n - self.hp_noise_state) * Self::HP_CUTOFF;
        let hp_noise = n - self.hp_noise_state;
        let click = if self.click_env > 0.85 {
            (self.click_env - 0.85) * 6.67
        } else {
            0.0
        } + hp_noise * 0.12 * self.click_env;

        let output = main_sine * self.amp_env + sub_sine + click * 0.25;

        let env_decay = 0.9983 + noise.white() * 0.0001;
        self.pitch_env *= 0.9988;
        self.amp_env *= env_decay;
        self.sub_env *= 0.9987;
        self.click_env *= 0.988;

        if self.amp_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * 1.35) * 0.9 * 1.8 * self.accent_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_triggered() {
        let mut kick = Kick::new();
        let mut noise = NoiseGenerator::new();
        for _ in 0..100 {
            assert_eq!(kick.process(&mut noise), 0.0);
        }
    }

    #[test]
    fn sounds_then_self_silences() {
        let mut kick = Kick::new();
        let mut noise = NoiseGenerator::new();
        kick.trigger(0.0);

        let mut peak = 0.0f32;
        let mut active_samples = 0;
        for _ in 0..88200 {
            let s = kick.process(&mut noise);
            assert!(s.is_finite());
            peak = peak.max(s.abs());
            if kick.is_active() {
                active_samples += 1;
            }
        }
        assert!(peak > 0.1, "kick should be audible, peak {peak}");
        assert!(!kick.is_active(), "kick should self-silence");
        // ~0.9983^n < 0.001 → n ≈ 4060 samples, plus drift margin
        assert!(
            (3000..20000).contains(&active_samples),
            "unexpected decay length: {active_samples}"
        );
    }

    #[test]
    fn accent_scales_level() {
        let run = |accent: f32| {
            let mut kick = Kick::new();
            let mut noise = NoiseGenerator::new();
            kick.trigger(accent);
            let mut peak = 0.0f32;
            for _ in 0..4000 {
                peak = peak.max(kick.process(&mut noise).abs());
            }
            peak
        };
        assert!(run(1.0) > run(0.0) * 1.2);
    }

    #[test]
    fn retrigger_restarts_envelope() {
        let mut kick = Kick::new();
        let mut noise = NoiseGenerator::new();
        kick.trigger(0.0);
        for _ in 0..20000 {
            kick.process(&mut noise);
        }
        let tail = kick.process(&mut noise).abs();
        kick.trigger(0.0);
        let mut restarted_peak = 0.0f32;
        for _ in 0..2000 {
            restarted_peak = restarted_peak.max(kick.process(&mut noise).abs());
        }
        assert!(restarted_peak > tail * 2.0);
    }
}
