//! Latin-kit hi-hat (shaker).

use tribu_core::fast_math::{TWO_PI, fast_sin, fast_tanh};
use tribu_core::noise::NoiseGenerator;

/// Shaker-style voice: three metallic partials (2.5–6.8 kHz) below the
/// other kits' hats, with high-tuned double-bandpassed noise and a long
/// shimmer tail.
#[derive(Debug, Clone)]
pub struct HiHat {
    env: f32,
    shimmer_env: f32,
    phases: [f32; 3],
    highpass: f32,
    bandpass1_a: f32,
    bandpass1_b: f32,
    bandpass2_a: f32,
    bandpass2_b: f32,
    inv_sample_rate: f32,
    triggered: bool,
}

impl Default for HiHat {
    fn default() -> Self {
        Self::new()
    }
}

impl HiHat {
    const FREQS: [f32; 3] = [2500.0, 4200.0, 6800.0];

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            env: 0.0,
            shimmer_env: 0.0,
            phases: [0.0; 3],
            highpass: 0.0,
            bandpass1_a: 0.0,
            bandpass1_b: 0.0,
            bandpass2_a: 0.0,
            bandpass2_b: 0.0,
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
        self.phases = [0.0; 3];
        self.highpass = 0.0;
        self.bandpass1_a = 0.0;
        self.bandpass1_b = 0.0;
        self.bandpass2_a = 0.0;
        self.bandpass2_b = 0.0;
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
            + fast_sin(self.phases[1]) * self.env * 0.7
            + fast_sin(self.phases[2]) * self.shimmer_env * 0.5;

        let raw = noise.white();
        self.highpass += (raw - self.highpass) * 0.3;
        let bright_noise = (raw - self.highpass) * self.env;

        self.bandpass1_a += (bright_noise - self.bandpass1_a) * 0.4;
        self.bandpass1_b += (self.bandpass1_a - self.bandpass1_b) * 0.4;
        let bp1_out = self.bandpass1_a - self.bandpass1_b;

        self.bandpass2_a += (bp1_out - self.bandpass2_a) * 0.5;
        self.bandpass2_b += (self.bandpass2_a - self.bandpass2_b) * 0.5;
        let bp2_out = self.bandpass2_a - self.bandpass2_b;

        let output = metallic * 0.6 + bp2_out * 0.8;

        self.env *= 0.9885;
        self.shimmer_env *= 0.9935;

        if self.env < 0.001 && self.shimmer_env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * 2.0) * 0.9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shimmer_outlasts_body() {
        let mut hat = HiHat::new();
        let mut noise = NoiseGenerator::new();
        hat.trigger(0.0);
        // Body envelope dead after ~600 samples, shimmer after ~1060.
        for _ in 0..800 {
            hat.process(&mut noise);
        }
        assert!(hat.is_active(), "shimmer tail should still be sounding");
        for _ in 0..2000 {
            hat.process(&mut noise);
        }
        assert!(!hat.is_active());
    }
}
