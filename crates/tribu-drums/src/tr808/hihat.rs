//! TR-808-style hi-hat.

use tribu_core::fast_math::fast_tanh;
use tribu_core::fast_math::TWO_PI;
use tribu_core::noise::NoiseGenerator;

/// The classic six-square-oscillator metal stack (325–715 Hz) pushed
/// through two bandpass stages and a highpass for the crisp attack, with
/// a pinch of raw noise on top.
#[derive(Debug, Clone)]
pub struct HiHat {
    env: f32,
    phases: [f32; 6],
    bandpass1_a: f32,
    bandpass1_b: f32,
    bandpass2_a: f32,
    bandpass2_b: f32,
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
    const FREQS: [f32; 6] = [325.0, 380.0, 445.0, 520.0, 610.0, 715.0];
    const BP1_CUTOFF: f32 = 0.25;
    const BP2_CUTOFF: f32 = 0.35;
    const HP_CUTOFF: f32 = 0.08;

    /// Create a silent voice at 44.1 kHz.
    pub fn new() -> Self {
        Self {
            env: 0.0,
            phases: [0.0; 6],
            bandpass1_a: 0.0,
            bandpass1_b: 0.0,
            bandpass2_a: 0.0,
            bandpass2_b: 0.0,
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
        self.phases = [0.0; 6];
        self.bandpass1_a = 0.0;
        self.bandpass1_b = 0.0;
        self.bandpass2_a = 0.0;
        self.bandpass2_b = 0.0;
        self.highpass = 0.0;
        self.triggered = true;
    }

    /// Stop and clear the voice.
    pub fn reset(&mut self) {
        self.triggered = false;
        self.env = 0.0;
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

        let mut square_sum = 0.0;
        for (phase, freq) in self.phases.iter_mut().zip(Self::FREQS) {
            *phase += freq * self.inv_sample_rate * TWO_PI;
            if *phase >= TWO_PI {
                *phase -= TWO_PI;
            }
            let square = if *phase < core::f32::consts::PI {
                1.0
            } else {
                -1.0
            };
            square_sum += square * (1.0 / 6.0);
        }

        self.bandpass1_a += (square_sum - self.bandpass1_a) * Self::BP1_CUTOFF;
        self.bandpass1_b += (self.bandpass1_a - self.bandpass1_b) * Self::BP1_CUTOFF;
        let bp1_out = self.bandpass1_a - self.bandpass1_b;

        self.bandpass2_a += (bp1_out - self.bandpass2_a) * Self::BP2_CUTOFF;
        self.bandpass2_b += (self.bandpass2_a - self.bandpass2_b) * Self::BP2_CUTOFF;
        let bp2_out = self.bandpass2_a - self.bandpass2_b;

        self.highpass += (bp2_out - self.highpass) * Self::HP_CUTOFF;
        let filtered = bp2_out - self.highpass;

        let noise_component = noise.white() * 0.15 * self.env;
        let output = (filtered + noise_component) * self.env;

        self.env *= 0.9915;

        if self.env < 0.001 {
            self.triggered = false;
        }

        fast_tanh(output * 3.0) * 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_decay() {
        let mut hat = HiHat::new();
        let mut noise = NoiseGenerator::new();
        hat.trigger(0.0);
        let mut active = 0;
        for _ in 0..44100 {
            assert!(hat.process(&mut noise).is_finite());
            if hat.is_active() {
                active += 1;
            }
        }
        // 0.9915^n < 0.001 → n ≈ 810 samples (~18 ms)
        assert!((500..2000).contains(&active), "decay length {active}");
    }
}
