//! MS20-style Sallen-Key lowpass with self-oscillation.
//!
//! Two-pole core with soft saturation at three points (input drive, the
//! highpass node, both integrator updates), modeling the cascaded OTA
//! stages of the original circuit. Above resonance 0.75 a tracked sine
//! oscillator phase-locked to the cutoff frequency is blended in,
//! reproducing the analog filter's self-oscillation whistle — the digital
//! core alone will not sing from silence, so the injector supplies the
//! tone the circuit would.
//!
//! All numeric hazards heal locally: denormals are flushed, a non-finite
//! input or state resets the filter to silence, and every control value
//! is clamped. A one-pole DC blocker sits on the output because the
//! asymmetric saturation rectifies slightly.

use super::{cutoff_hz, ms20_saturate, resonance_gain};
use crate::dc_blocker::DcBlocker;
use crate::fast_math::{fast_sin, flush_denormal, TWO_PI};
use core::f32::consts::PI;

/// The voice's main filter topology.
#[derive(Debug, Clone)]
pub struct Ms20Filter {
    s1: f32,
    s2: f32,
    cutoff_param: f32,
    resonance_param: f32,
    sample_rate: f32,
    inv_sample_rate: f32,
    osc_phase: f32,
    active: bool,
    dc_blocker: DcBlocker,
}

impl Default for Ms20Filter {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Ms20Filter {
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
            dc_blocker: DcBlocker::new(sample_rate, 20.0),
        };
        filter.set_sample_rate(sample_rate);
        filter
    }

    /// Update the sample rate. Rates below 8 kHz are clamped up.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(8000.0);
        self.inv_sample_rate = 1.0 / self.sample_rate;
        self.dc_blocker.set_sample_rate(self.sample_rate);
    }

    /// Set normalized cutoff in [0, 1].
    pub fn set_cutoff(&mut self, param: f32) {
        self.cutoff_param = param.clamp(0.0, 1.0);
    }

    /// Set normalized resonance in [0, 1].
    pub fn set_resonance(&mut self, param: f32) {
        self.resonance_param = param.clamp(0.0, 1.0);
    }

    /// Enable or disable; disabling clears the state so re-enabling does
    /// not replay stale energy.
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
        self.dc_blocker.reset();
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

        // Self-oscillation injector: above resonance 0.75 blend in a sine
        // tracked at the cutoff frequency. Gain fades in over the last
        // quarter of the knob; the tone is tamed near Nyquist.
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
        self.dc_blocker.process(ms20_saturate(output * final_gain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn rms(filter: &mut Ms20Filter, input: impl Fn(usize) -> f32, n: usize) -> f32 {
        let mut acc = 0.0f32;
        for i in 0..n {
            let out = filter.process(input(i));
            acc += out * out;
        }
        libm::sqrtf(acc / n as f32)
    }

    #[test]
    fn finite_over_parameter_grid() {
        for c in 0..=10 {
            for r in 0..=10 {
                let mut filter = Ms20Filter::new(SR);
                filter.set_cutoff(c as f32 / 10.0);
                filter.set_resonance(r as f32 / 10.0);
                let mut phase = 0.0f32;
                for i in 0..10_000 {
                    // Full-scale saw input
                    phase += 220.0 / SR;
                    if phase >= 1.0 {
                        phase -= 1.0;
                    }
                    let out = filter.process(2.0 * phase - 1.0);
                    assert!(
                        out.is_finite(),
                        "non-finite at c={c} r={r} sample {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn passes_low_frequencies_attenuates_high() {
        let mut filter = Ms20Filter::new(SR);
        filter.set_cutoff(0.5); // ~660 Hz
        filter.set_resonance(0.0);

        let low = rms(
            &mut filter,
            |i| libm::sinf(TWO_PI * 110.0 * i as f32 / SR),
            20_000,
        );
        filter.reset();
        let high = rms(
            &mut filter,
            |i| libm::sinf(TWO_PI * 8000.0 * i as f32 / SR),
            20_000,
        );
        assert!(
            low > high * 4.0,
            "lowpass response missing: low={low} high={high}"
        );
    }

    #[test]
    fn self_oscillates_on_silence_at_high_resonance() {
        let mut filter = Ms20Filter::new(SR);
        filter.set_cutoff(0.6);
        filter.set_resonance(0.95);
        let level = rms(&mut filter, |_| 0.0, 20_000);
        assert!(level > 0.01, "expected self-oscillation, rms={level}");
    }

    #[test]
    fn no_self_oscillation_below_injector_threshold() {
        let mut filter = Ms20Filter::new(SR);
        filter.set_cutoff(0.6);
        filter.set_resonance(0.7);
        let level = rms(&mut filter, |_| 0.0, 20_000);
        assert!(level < 1e-4, "silent input should stay silent, rms={level}");
    }

    #[test]
    fn self_oscillation_frequency_tracks_cutoff() {
        // Count zero crossings of the self-oscillation tone at several
        // cutoffs; the ordering must be monotonic non-decreasing.
        let mut crossings = [0usize; 6];
        for (slot, c) in [0.4, 0.5, 0.6, 0.7, 0.8, 0.9].iter().enumerate() {
            let mut filter = Ms20Filter::new(SR);
            filter.set_cutoff(*c);
            filter.set_resonance(0.95);
            // settle
            for _ in 0..4410 {
                filter.process(0.0);
            }
            let mut prev = filter.process(0.0);
            let mut count = 0;
            for _ in 0..44100 {
                let s = filter.process(0.0);
                if prev <= 0.0 && s > 0.0 {
                    count += 1;
                }
                prev = s;
            }
            crossings[slot] = count;
        }
        for w in crossings.windows(2) {
            assert!(
                w[1] >= w[0],
                "oscillation frequency not monotonic in cutoff: {crossings:?}"
            );
        }
    }

    #[test]
    fn nan_input_heals_to_silence() {
        let mut filter = Ms20Filter::new(SR);
        for _ in 0..100 {
            filter.process(0.5);
        }
        assert_eq!(filter.process(f32::NAN), 0.0);
        // Healthy afterwards
        for _ in 0..100 {
            assert!(filter.process(0.5).is_finite());
        }
    }

    #[test]
    fn inactive_is_silent_and_clears_state() {
        let mut filter = Ms20Filter::new(SR);
        for _ in 0..100 {
            filter.process(1.0);
        }
        filter.set_active(false);
        assert_eq!(filter.process(1.0), 0.0);
        filter.set_active(true);
        // First sample after re-enable carries no stale integrator energy
        let out = filter.process(0.0);
        assert!(out.abs() < 1e-3, "stale state after re-enable: {out}");
    }

    #[test]
    fn output_has_no_dc() {
        let mut filter = Ms20Filter::new(SR);
        filter.set_cutoff(0.7);
        filter.set_resonance(0.9);
        // Rectifying input: half-wave sine pushes DC through the
        // asymmetric saturation.
        for _ in 0..44100 {
            filter.process(0.8);
        }
        let mut mean = 0.0f32;
        for _ in 0..44100 {
            mean += filter.process(0.8);
        }
        mean /= 44100.0;
        assert!(mean.abs() < 0.05, "DC leaked through: {mean}");
    }
}
