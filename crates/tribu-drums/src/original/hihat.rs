//! Original-kit hi-hat.

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Four inharmonic sine partials (7.2–13.6 kHz) for the metallic body,
/// the upper two on a longer shimmer envelope, mixed with highpassed and
/// bandpassed noise.
#[derive(Debug, Clone)]
pub struct HiHat {
    env: f32,
    shimmer_env: f32,
    phases: [f32; 4],
    bandpass1: f32,
    bandpass2: f32,
    highpass: f32,
    inv_sample_rate: f32,
    triggered: bool,
}

impl Default for HiHat {
    fn default() -> Self {
        Self::new()
    }
}

impl HiHat {
    const FREQS: [f32; 4] = [7200.0, 8800.0, 11200.0, 13600.0];

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            env: 0.0,
            shimmer_env: 0.0,
            phases: [0.0; 4],
            bandpass1: 0.0,
            bandpass2: 0.0,
            highpass: 0.0,
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
        self.env = 1.0;
        self.shimmer_env = 1.0;
        self.phases = [0.0; 4];
        self.bandpass1 = 0.0;
        self.bandpass2 = 0.0;
        self.highpass = 0.0;
        self.triggered = true;
    }

    /// Stop and clear the voice.
    pub fn reset(&mut self) {
        self.triggered = false;
        self.env = 0.0;
        self.shimmer_env = 0.0;
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

        for (phase, freq) in self.phases.iter_mut().zip(Self::FREQS) {
            *phase += freq * self.inv_sample_rate * TWO_PI;
            if *phase >= TWO_PI {
                *phase -= TWO_PI;
            }
        }

        let metallic = fast_sin(self.phases[0]) * self.env
            + fast_sin(self.phases[1]) * self.env * 0.8
            + fast_sin(self.phases[2]) * self.shimmer_env * 0.6
            + fast_sin(self.phases[3]) * self.shimmer_env * 0.4;

        let raw = noise.white();
        self.highpass += (raw - self.highpass) * 0.2;
        let bright_noise = (raw - self.highpass) * self.env;
        self.bandpass1 += (bright_noise - self.bandpass1) * 0.3;
        self.bandpass2 += (self.bandpass1 - self.bandpass2) * 0.3;
        let filtered_noise = self.bandpass1 - self.bandpass2;

        let output = metallic * 0.6 + filtered_noise * 0.7;

        self.env *= 0.9890;
        self.shimmer_env *= 0.9920;

        if self.env < 0.001 && self.shimmer_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * 1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_faster_than_a_second() {
        let mut hat = HiHat::new();
        let mut noise = NoiseGenerator::new();
        hat.trigger(0.0);
        let mut active = 0;
        for _ in 0..44100 {
            hat.process(&mut noise);
            if hat.is_active() {
                active += 1;
            }
        }
        assert!(!hat.is_active());
        assert!(active < 44100, "hi-hat should die within a second");
    }

    #[test]
    fn output_bounded_by_saturation() {
        let mut hat = HiHat::new();
        let mut noise = NoiseGenerator::new();
        hat.trigger(1.0);
        for _ in 0..10000 {
            let s = hat.process(&mut noise);
            assert!(s.abs() <= 1.0, "tanh-bounded output exceeded: {s}");
        }
    }
}
