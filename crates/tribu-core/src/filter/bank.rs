//! Filter topology selection and parameter smoothing.

use super::{LadderFilter, MoogFilter, Ms20Filter, Ms20PreviousFilter};

/// The closed set of filter topologies. The variant set is fixed at
/// compile time, so selection is an enum switch rather than dynamic
/// dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterTopology {
    /// Current MS20-style core.
    #[default]
    Ms20,
    /// Legacy MS20 revision (low-cutoff fade quirk).
    Ms20Previous,
    /// Transistor ladder.
    Ladder,
    /// Moog-style saturated ladder.
    Moog,
}

impl FilterTopology {
    /// Map a persisted index back to a topology. Unknown values fall back
    /// to `Ms20`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Ms20Previous,
            2 => Self::Ladder,
            3 => Self::Moog,
            _ => Self::Ms20,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Ms20 => 0,
            Self::Ms20Previous => 1,
            Self::Ladder => 2,
            Self::Moog => 3,
        }
    }
}

/// Owns all four topologies, routes processing to the selected one, and
/// smooths the cutoff/resonance controls.
///
/// The smoothing is asymmetric in the jump size: the per-sample
/// coefficient grows with the distance still to travel,
/// `alpha = clamp(0.001 + |Δ|·0.03, …, 0.02)`, so knob jitter is heavily
/// filtered (no zipper noise) while a full-range sweep still lands within
/// a few milliseconds instead of lagging audibly behind the knob.
///
/// Smoothed values are forwarded to the active topology only when they
/// move by more than a threshold, sparing per-sample coefficient math.
#[derive(Debug, Clone)]
pub struct FilterBank {
    topology: FilterTopology,
    ms20: Ms20Filter,
    ms20_previous: Ms20PreviousFilter,
    ladder: LadderFilter,
    moog: MoogFilter,

    cutoff: f32,
    resonance: f32,
    target_cutoff: f32,
    target_resonance: f32,
    applied_cutoff: f32,
    applied_resonance: f32,
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl FilterBank {
    const ALPHA_BASE: f32 = 0.001;
    const ALPHA_SLEW: f32 = 0.03;
    const ALPHA_MAX: f32 = 0.02;
    const APPLY_THRESHOLD: f32 = 0.001;

    /// Create a bank at the given sample rate with the MS20 selected.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            topology: FilterTopology::Ms20,
            ms20: Ms20Filter::new(sample_rate),
            ms20_previous: Ms20PreviousFilter::new(sample_rate),
            ladder: LadderFilter::new(sample_rate),
            moog: MoogFilter::new(sample_rate),
            cutoff: 0.5,
            resonance: 0.0,
            target_cutoff: 0.5,
            target_resonance: 0.0,
            applied_cutoff: -1.0,
            applied_resonance: -1.0,
        }
    }

    /// Select the active topology. The outgoing topology is reset so a
    /// later switch back does not replay stale state.
    pub fn set_topology(&mut self, topology: FilterTopology) {
        if self.topology != topology {
            match self.topology {
                FilterTopology::Ms20 => self.ms20.reset(),
                FilterTopology::Ms20Previous => self.ms20_previous.reset(),
                FilterTopology::Ladder => self.ladder.reset(),
                FilterTopology::Moog => self.moog.reset(),
            }
            self.topology = topology;
            // Force a parameter push to the newly active topology.
            self.applied_cutoff = -1.0;
            self.applied_resonance = -1.0;
        }
    }

    /// Currently selected topology.
    pub fn topology(&self) -> FilterTopology {
        self.topology
    }

    /// Set the cutoff target, normalized [0, 1].
    pub fn set_cutoff(&mut self, param: f32) {
        self.target_cutoff = param.clamp(0.0, 1.0);
    }

    /// Set the resonance target, normalized [0, 1].
    pub fn set_resonance(&mut self, param: f32) {
        self.target_resonance = param.clamp(0.0, 1.0);
    }

    /// Current smoothed cutoff (for UI feedback / tests).
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Current smoothed resonance.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Snap both parameters to their targets, bypassing smoothing. Used
    /// at patch load so a saved sweep position does not glide in.
    pub fn snap_parameters(&mut self) {
        self.cutoff = self.target_cutoff;
        self.resonance = self.target_resonance;
    }

    /// Enable or disable all topologies.
    pub fn set_active(&mut self, active: bool) {
        self.ms20.set_active(active);
        self.ms20_previous.set_active(active);
        self.ladder.set_active(active);
        self.moog.set_active(active);
    }

    /// Update the sample rate on every topology.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ms20.set_sample_rate(sample_rate);
        self.ms20_previous.set_sample_rate(sample_rate);
        self.ladder.set_sample_rate(sample_rate);
        self.moog.set_sample_rate(sample_rate);
    }

    /// Reset every topology's state.
    pub fn reset(&mut self) {
        self.ms20.reset();
        self.ms20_previous.reset();
        self.ladder.reset();
        self.moog.reset();
    }

    /// Process one sample through the active topology.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.cutoff = smooth_toward(self.cutoff, self.target_cutoff);
        self.resonance = smooth_toward(self.resonance, self.target_resonance);

        if (self.cutoff - self.applied_cutoff).abs() > Self::APPLY_THRESHOLD {
            self.applied_cutoff = self.cutoff;
            match self.topology {
                FilterTopology::Ms20 => self.ms20.set_cutoff(self.cutoff),
                FilterTopology::Ms20Previous => self.ms20_previous.set_cutoff(self.cutoff),
                FilterTopology::Ladder => self.ladder.set_cutoff(self.cutoff),
                FilterTopology::Moog => self.moog.set_cutoff(self.cutoff),
            }
        }
        if (self.resonance - self.applied_resonance).abs() > Self::APPLY_THRESHOLD {
            self.applied_resonance = self.resonance;
            match self.topology {
                FilterTopology::Ms20 => self.ms20.set_resonance(self.resonance),
                FilterTopology::Ms20Previous => self.ms20_previous.set_resonance(self.resonance),
                FilterTopology::Ladder => self.ladder.set_resonance(self.resonance),
                FilterTopology::Moog => self.moog.set_resonance(self.resonance),
            }
        }

        match self.topology {
            FilterTopology::Ms20 => self.ms20.process(input),
            FilterTopology::Ms20Previous => self.ms20_previous.process(input),
            FilterTopology::Ladder => self.ladder.process(input),
            FilterTopology::Moog => self.moog.process(input),
        }
    }
}

/// One smoothing step with the jump-proportional coefficient.
#[inline]
fn smooth_toward(current: f32, target: f32) -> f32 {
    let delta = target - current;
    let alpha = (FilterBank::ALPHA_BASE + delta.abs() * FilterBank::ALPHA_SLEW)
        .min(FilterBank::ALPHA_MAX);
    let next = current + delta * alpha;
    // Land exactly once within the apply threshold so tiny deltas do not
    // dither around the target forever.
    if (target - next).abs() < 1e-4 { target } else { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    #[test]
    fn all_topologies_process_finite() {
        for topology in [
            FilterTopology::Ms20,
            FilterTopology::Ms20Previous,
            FilterTopology::Ladder,
            FilterTopology::Moog,
        ] {
            let mut bank = FilterBank::new(SR);
            bank.set_topology(topology);
            bank.set_cutoff(0.7);
            bank.set_resonance(0.8);
            for i in 0..5000 {
                let input = if i == 0 { 1.0 } else { 0.0 };
                assert!(bank.process(input).is_finite(), "{topology:?}");
            }
        }
    }

    #[test]
    fn small_changes_smooth_slowly_large_jump_faster() {
        let mut bank = FilterBank::new(SR);
        bank.set_cutoff(0.5);
        bank.snap_parameters();

        // Small nudge
        bank.set_cutoff(0.52);
        bank.process(0.0);
        let small_step = (bank.cutoff() - 0.5).abs();

        // Full-range jump from the same start
        let mut bank = FilterBank::new(SR);
        bank.set_cutoff(0.0);
        bank.snap_parameters();
        bank.set_cutoff(1.0);
        bank.process(0.0);
        let large_step = bank.cutoff();

        let small_rate = small_step / 0.02;
        let large_rate = large_step / 1.0;
        assert!(
            large_rate > small_rate * 5.0,
            "large jumps should slew proportionally faster: {small_rate} vs {large_rate}"
        );
    }

    #[test]
    fn smoothing_converges() {
        let mut bank = FilterBank::new(SR);
        bank.set_cutoff(0.0);
        bank.snap_parameters();
        bank.set_cutoff(1.0);
        for _ in 0..20_000 {
            bank.process(0.0);
        }
        assert!((bank.cutoff() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn smoothing_never_overshoots() {
        let mut bank = FilterBank::new(SR);
        bank.set_resonance(0.0);
        bank.snap_parameters();
        bank.set_resonance(0.9);
        let mut prev = 0.0;
        for _ in 0..10_000 {
            bank.process(0.0);
            let r = bank.resonance();
            assert!(r >= prev - 1e-6 && r <= 0.9 + 1e-6, "overshoot: {r}");
            prev = r;
        }
    }

    #[test]
    fn topology_switch_resets_outgoing_state() {
        let mut bank = FilterBank::new(SR);
        bank.set_cutoff(0.8);
        for _ in 0..1000 {
            bank.process(1.0);
        }
        bank.set_topology(FilterTopology::Ladder);
        bank.set_topology(FilterTopology::Ms20);
        let out = bank.process(0.0);
        assert!(out.abs() < 1e-3, "stale MS20 state after switch: {out}");
    }

    #[test]
    fn topology_index_roundtrip() {
        for t in [
            FilterTopology::Ms20,
            FilterTopology::Ms20Previous,
            FilterTopology::Ladder,
            FilterTopology::Moog,
        ] {
            assert_eq!(FilterTopology::from_index(t.index()), t);
        }
        assert_eq!(FilterTopology::from_index(77), FilterTopology::Ms20);
    }
}
