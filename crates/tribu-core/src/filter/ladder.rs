//! Transistor-ladder lowpass, 4-pole.

use super::cutoff_hz;
use crate::fast_math::{fast_sin, fast_tanh};
use core::f32::consts::PI;

/// Four cascaded one-pole sections with tanh waveshaping on each stage
/// input and resonance feedback from the last stage to the first.
///
/// The coefficient is the same `2·sin(π·fc/sr)` map the MS20 core uses,
/// clamped a little wider (0.99) since the cascade is unconditionally
/// stable under the tanh limiter.
#[derive(Debug, Clone)]
pub struct LadderFilter {
    y1: f32,
    y2: f32,
    y3: f32,
    y4: f32,
    cutoff_param: f32,
    resonance_param: f32,
    inv_sample_rate: f32,
    active: bool,
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl LadderFilter {
    /// Create a filter at the given sample rate, cutoff mid-travel.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            y1: 0.0,
            y2: 0.0,
            y3: 0.0,
            y4: 0.0,
            cutoff_param: 0.5,
            resonance_param: 0.0,
            inv_sample_rate: 1.0 / 44100.0,
            active: true,
        };
        filter.set_sample_rate(sample_rate);
        filter
    }

    /// Update the sample rate. Rates below 8 kHz are clamped up.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sample_rate = 1.0 / sample_rate.max(8000.0);
    }

    /// Set normalized cutoff in [0, 1].
    pub fn set_cutoff(&mut self, param: f32) {
        self.cutoff_param = param.clamp(0.0, 1.0);
    }

    /// Set normalized resonance in [0, 1]; maps to feedback gain 0–4.
    pub fn set_resonance(&mut self, param: f32) {
        self.resonance_param = param.clamp(0.0, 1.0);
    }

    /// Enable or disable; disabling clears the state.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.reset();
        }
    }

    /// Clear all stage state.
    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.y3 = 0.0;
        self.y4 = 0.0;
    }

    /// Process one sample. Inactive filters output silence.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.active {
            return 0.0;
        }
        let cutoff = cutoff_hz(self.cutoff_param);
        let res = self.resonance_param * 4.0;
        let f = (2.0 * fast_sin(PI * cutoff * self.inv_sample_rate)).clamp(0.0, 0.99);

        let x = input - res * self.y4;
        self.y1 += f * fast_tanh(x - self.y1);
        self.y2 += f * fast_tanh(self.y1 - self.y2);
        self.y3 += f * fast_tanh(self.y2 - self.y3);
        self.y4 += f * fast_tanh(self.y3 - self.y4);

        if !self.y4.is_finite() {
            self.reset();
            return 0.0;
        }
        self.y4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_math::TWO_PI;

    const SR: f32 = 44100.0;

    #[test]
    fn finite_over_parameter_grid() {
        for c in 0..=10 {
            for r in 0..=10 {
                let mut filter = LadderFilter::new(SR);
                filter.set_cutoff(c as f32 / 10.0);
                filter.set_resonance(r as f32 / 10.0);
                for i in 0..5000 {
                    let input = libm::sinf(TWO_PI * 220.0 * i as f32 / SR);
                    assert!(filter.process(input).is_finite());
                }
            }
        }
    }

    #[test]
    fn passes_dc_at_zero_resonance() {
        let mut filter = LadderFilter::new(SR);
        filter.set_cutoff(0.8);
        filter.set_resonance(0.0);
        let mut out = 0.0;
        for _ in 0..20_000 {
            out = filter.process(0.5);
        }
        assert!((out - 0.5).abs() < 0.05, "DC gain should be ~1, got {out}");
    }

    #[test]
    fn steeper_than_two_pole_rolloff() {
        // A tone three octaves above cutoff should be attenuated hard.
        let mut filter = LadderFilter::new(SR);
        filter.set_cutoff(0.5); // ~660 Hz
        filter.set_resonance(0.0);
        let tone = 5280.0;
        let mut acc = 0.0f32;
        for i in 0..40_000 {
            let input = libm::sinf(TWO_PI * tone * i as f32 / SR);
            let out = filter.process(input);
            if i >= 20_000 {
                acc += out * out;
            }
        }
        let rms = libm::sqrtf(acc / 20_000.0);
        // 4-pole at -24 dB/oct × 3 oct = -72 dB; allow a generous margin.
        assert!(rms < 0.02, "insufficient rolloff: rms={rms}");
    }

    #[test]
    fn resonance_boosts_near_cutoff() {
        let cutoff_param = 0.5;
        let near = cutoff_hz(cutoff_param);
        let run = |resonance: f32| {
            let mut filter = LadderFilter::new(SR);
            filter.set_cutoff(cutoff_param);
            filter.set_resonance(resonance);
            let mut acc = 0.0f32;
            for i in 0..40_000 {
                let input = 0.1 * libm::sinf(TWO_PI * near * i as f32 / SR);
                let out = filter.process(input);
                if i >= 20_000 {
                    acc += out * out;
                }
            }
            libm::sqrtf(acc / 20_000.0)
        };
        assert!(run(0.7) > run(0.0) * 1.2, "resonance should peak at cutoff");
    }

    #[test]
    fn inactive_is_silent() {
        let mut filter = LadderFilter::new(SR);
        filter.set_active(false);
        assert_eq!(filter.process(1.0), 0.0);
    }
}
