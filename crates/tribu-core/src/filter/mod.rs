//! Resonant lowpass filter bank.
//!
//! Four interchangeable topologies share one interface (`set_cutoff` /
//! `set_resonance` normalized to [0, 1], `process`, `reset`,
//! `set_sample_rate`, `set_active`):
//!
//! - [`Ms20Filter`] — the voice's main filter: a 2-pole Sallen-Key-style
//!   core with three saturation stages and a resonance-driven
//!   self-oscillation injector.
//! - [`Ms20PreviousFilter`] — the earlier revision of the same core, kept
//!   so stored patches keep their sound. Carries a known low-cutoff
//!   fade-to-silence quirk.
//! - [`LadderFilter`] / [`MoogFilter`] — 4-stage transistor-ladder
//!   cascades with tanh waveshaping.
//!
//! All four output silence while inactive. [`FilterBank`] selects exactly
//! one topology via a closed enum and owns the parameter smoothing; the
//! topologies themselves apply control values immediately.

mod bank;
mod ladder;
mod moog;
mod ms20;
mod ms20_previous;

pub use bank::{FilterBank, FilterTopology};
pub use ladder::LadderFilter;
pub use moog::MoogFilter;
pub use ms20::Ms20Filter;
pub use ms20_previous::Ms20PreviousFilter;

/// Normalized cutoff parameter to Hz: `20 · e^(7p)`, spanning
/// 20 Hz – 22 kHz over the knob's travel.
#[inline]
pub(crate) fn cutoff_hz(param: f32) -> f32 {
    20.0 * libm::expf(7.0 * param.clamp(0.001, 1.0))
}

/// Normalized resonance parameter to feedback gain: quadratic-plus-linear
/// law that keeps the low half of the knob subtle and the top aggressive.
#[inline]
pub(crate) fn resonance_gain(param: f32) -> f32 {
    let p = param.clamp(0.0, 1.0);
    p * p * 6.0 + p * 1.5
}

/// Asymmetric two-segment saturation shared by the MS20 cores.
///
/// Hard clamp at ±4, then a rational soft knee that squashes positive
/// excursions slightly less than negative ones, mimicking the OTA core's
/// asymmetry.
#[inline]
pub(crate) fn ms20_saturate(x: f32) -> f32 {
    let x = x.clamp(-4.0, 4.0);
    if x > 0.0 {
        x / (1.0 + x * 0.4)
    } else {
        x / (1.0 + x.abs() * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_map_spans_audio_band() {
        assert!((cutoff_hz(0.001) - 20.1).abs() < 0.2);
        let top = cutoff_hz(1.0);
        assert!((21000.0..23000.0).contains(&top), "top of travel: {top}");
        // Monotonic
        let mut prev = 0.0;
        for i in 0..=100 {
            let hz = cutoff_hz(i as f32 / 100.0);
            assert!(hz > prev);
            prev = hz;
        }
    }

    #[test]
    fn resonance_map_endpoints() {
        assert_eq!(resonance_gain(0.0), 0.0);
        assert!((resonance_gain(1.0) - 7.5).abs() < 1e-5);
    }

    #[test]
    fn saturation_is_bounded_and_asymmetric() {
        for i in -100..=100 {
            let x = i as f32 * 0.1;
            let y = ms20_saturate(x);
            assert!(y.abs() < 2.0);
        }
        // Positive knee is softer than negative
        assert!(ms20_saturate(2.0) > -ms20_saturate(-2.0));
    }
}
