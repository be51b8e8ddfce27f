//! Earlier revision of the MS20 core, kept for patch compatibility.
//!
//! Same two-pole saturated core and self-oscillation injector as
//! [`Ms20Filter`](super::Ms20Filter), with two differences that change
//! the sound of old patches enough to preserve:
//!
//! - a low-cutoff fade: output is muted below cutoff param 0.3 and fades
//!   in quadratically up to 0.4. Whether this was intentional vintage
//!   character or a bug is ambiguous; it is preserved as-is and pinned by
//!   a test.
//! - no output DC blocker.

use super::{cutoff_hz, ms20_saturate, resonance_gain};
use crate::fast_math::{fast_sin, flush_denormal, TWO_PI};
use core::f32::consts::PI;

/// Legacy MS20 variant selectable for A/B comparison.
#[derive(Debug, Clone)]
pub struct Ms20PreviousFilter {
    s1: f32,
    s2: f32,
    cutoff_param: f32,
    resonance_param: f32,
    sample_rate: f32,
    inv_sample_rate: f32,
    osc_phase: f32,
    active: bool,
}

impl Default for Ms20PreviousFilter {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Ms20PreviousFilter {
    /// Create a filter at the given sample rate, cutoff mid-travel.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            s1: 0.0,
            s2: 0.0,
            cutoff_param: 0.5,
            resonance_param: 0.0,
            sample_rate: 44100.0,
            inv_sample_rate: 1.0 / 44100.0,
            osc_phase: 0.0,
            active: true,
        };
        filter.set_sample_rate(sample_rate);
        filter
    }

    /// Update the sample rate. Rates below 8 kHz are clamped up.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(8000.0);
        self.inv_sample_rate = 1.0 / self.sample_rate;
    }

    /// Set normalized cutoff in [0, 1].
    pub fn set_cutoff(&mut self, param: f32) {
        self.cutoff_param = param.clamp(0.0, 1.0);
    }

    /// Set normalized resonance in [0, 1].
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

    /// Clear all filter state.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
        self.osc_phase = 0.0;
    }

    /// Process one sample. Inactive filters output silence.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.active {
            return 0.0;
        }

        let input = flush_denormal(input);
        self.s1 = flush_denormal(self.s1);
        self.s2 = flush_denormal(self.s2);

        if !input.is_finite() {
            self.reset();
            return 0.0;
        }

        let cutoff = cutoff_hz(self.cutoff_param).clamp(20.0, self.sample_rate * 0.35);
        let resonance = resonance_gain(self.resonance_param);
        let f = (2.0 * fast_sin(PI * cutoff * self.inv_sample_rate)).clamp(0.0, 0.9);

        let drive = 1.0 + self.resonance_param * 1.2;
        let driven = ms20_saturate(input * drive);

        let hp = ms20_saturate(driven - resonance * self.s2 - self.s1);
        self.s1 += f * ms20_saturate(hp);
        self.s2 += f * ms20_saturate(self.s1);

        if !self.s2.is_finite() {
            self.reset();
            return 0.0;
        }

        let mut output = self.s2;

        // Legacy quirk: the bottom of the cutoff travel mutes the filter,
        // fading back in quadratically between 0.3 and 0.4.
        if self.cutoff_param < 0.4 {
            if self.cutoff_param < 0.3 {
                output = 0.0;
            } else {
                let fade = (self.cutoff_param - 0.3) * 10.0;
                output *= 0.01 + fade * fade * 0.99;
            }
        }

        if self.resonance_param > 0.75 {
            let osc_gain = (self.resonance_param - 0.75) * 4.0;
            self.osc_phase += TWO_PI * cutoff * self.inv_sample_rate;
            if self.osc_phase >= TWO_PI {
                self.osc_phase -= TWO_PI;
            }
            let mut osc = fast_sin(self.osc_phase) * osc_gain * 0.15;
            if cutoff > self.sample_rate * 0.25 {
                osc *= 0.5;
            }
            output = output * (1.0 - osc_gain * 0.3) + osc;
        }

        output = flush_denormal(output);
        let final_gain = 1.1 + self.resonance_param * 0.3;
        ms20_saturate(output * final_gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn rms_of_saw(filter: &mut Ms20PreviousFilter, n: usize) -> f32 {
        let mut phase = 0.0f32;
        let mut acc = 0.0f32;
        for _ in 0..n {
            phase += 220.0 / SR;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            let out = filter.process(2.0 * phase - 1.0);
            acc += out * out;
        }
        libm::sqrtf(acc / n as f32)
    }

    #[test]
    fn low_cutoff_fade_quirk_is_preserved() {
        // Below 0.3 the legacy filter is silent even with hot input.
        let mut filter = Ms20PreviousFilter::new(SR);
        filter.set_cutoff(0.25);
        let muted = rms_of_saw(&mut filter, 10_000);
        assert!(muted < 1e-4, "legacy mute region should be silent: {muted}");

        // In the fade region output is attenuated but present.
        let mut filter = Ms20PreviousFilter::new(SR);
        filter.set_cutoff(0.35);
        let faded = rms_of_saw(&mut filter, 10_000);

        // Above the fade region output is full.
        let mut filter = Ms20PreviousFilter::new(SR);
        filter.set_cutoff(0.45);
        let full = rms_of_saw(&mut filter, 10_000);

        assert!(faded > 1e-4, "fade region should not be fully muted");
        assert!(full > faded, "fade should attenuate: {faded} vs {full}");
    }

    #[test]
    fn finite_over_parameter_grid() {
        for c in 0..=10 {
            for r in 0..=10 {
                let mut filter = Ms20PreviousFilter::new(SR);
                filter.set_cutoff(c as f32 / 10.0);
                filter.set_resonance(r as f32 / 10.0);
                for _ in 0..2000 {
                    assert!(filter.process(1.0).is_finite());
                }
            }
        }
    }

    #[test]
    fn nan_input_heals() {
        let mut filter = Ms20PreviousFilter::new(SR);
        assert_eq!(filter.process(f32::INFINITY), 0.0);
        assert!(filter.process(0.5).is_finite());
    }

    #[test]
    fn self_oscillation_survives_in_legacy_core() {
        let mut filter = Ms20PreviousFilter::new(SR);
        filter.set_cutoff(0.6);
        filter.set_resonance(0.95);
        let mut acc = 0.0f32;
        for _ in 0..20_000 {
            let out = filter.process(0.0);
            acc += out * out;
        }
        assert!(libm::sqrtf(acc / 20_000.0) > 0.01);
    }
}
