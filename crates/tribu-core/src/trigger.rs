//! Edge detection and pulse generation.
//!
//! The voice reacts to buttons and gate/sync voltages by comparing the
//! current value against the previous sample — there are no callbacks or
//! interrupts inside the audio callback. [`GateTrigger`] is a Schmitt
//! trigger with a high/low hysteresis band; [`PulseGen`] emits a
//! fixed-length high pulse, used for the sync output.

/// Schmitt-style rising-edge detector with hysteresis.
///
/// The detector goes high when the input crosses the high threshold and
/// re-arms only after the input falls below the low threshold, so a noisy
/// signal hovering near the threshold produces a single trigger.
#[derive(Debug, Clone, Default)]
pub struct GateTrigger {
    high: bool,
}

impl GateTrigger {
    /// Create a detector in the low (armed) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a boolean condition; returns `true` on the rising edge only.
    #[inline]
    pub fn process_bool(&mut self, state: bool) -> bool {
        let triggered = state && !self.high;
        self.high = state;
        triggered
    }

    /// Feed a voltage-like signal with a 0.1/1.0 hysteresis band;
    /// returns `true` on the rising edge.
    #[inline]
    pub fn process(&mut self, voltage: f32) -> bool {
        if self.high {
            if voltage <= 0.1 {
                self.high = false;
            }
            false
        } else if voltage >= 1.0 {
            self.high = true;
            true
        } else {
            false
        }
    }

    /// Whether the detector is currently in the high state.
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Return to the low (armed) state.
    pub fn reset(&mut self) {
        self.high = false;
    }
}

/// Fixed-length pulse generator.
///
/// `trigger(duration)` arms a pulse; `process(sample_time)` counts it
/// down and reports whether the output is still high. Retriggering
/// extends the pulse rather than queueing a second one.
#[derive(Debug, Clone, Default)]
pub struct PulseGen {
    remaining: f32,
}

impl PulseGen {
    /// Create an idle pulse generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or extend) a pulse of `duration` seconds.
    pub fn trigger(&mut self, duration: f32) {
        if duration > self.remaining {
            self.remaining = duration;
        }
    }

    /// Advance by one sample; returns `true` while the pulse is high.
    #[inline]
    pub fn process(&mut self, sample_time: f32) -> bool {
        if self.remaining > 0.0 {
            self.remaining -= sample_time;
            true
        } else {
            false
        }
    }

    /// Cancel any pending pulse.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_edge_fires_once() {
        let mut trig = GateTrigger::new();
        assert!(trig.process(5.0));
        assert!(!trig.process(5.0));
        assert!(!trig.process(5.0));
    }

    #[test]
    fn hysteresis_band_ignores_wobble() {
        let mut trig = GateTrigger::new();
        assert!(trig.process(5.0));
        // Falls into the band but not below the low threshold: stays armed-high
        assert!(!trig.process(0.5));
        assert!(!trig.process(1.5));
        // Full release then rise again
        assert!(!trig.process(0.0));
        assert!(trig.process(2.0));
    }

    #[test]
    fn tracks_level_state() {
        let mut trig = GateTrigger::new();
        assert!(!trig.is_high());
        trig.process(5.0);
        assert!(trig.is_high());
        trig.process(0.0);
        assert!(!trig.is_high());
        trig.process(5.0);
        trig.reset();
        assert!(!trig.is_high());
    }

    #[test]
    fn bool_edges() {
        let mut trig = GateTrigger::new();
        assert!(!trig.process_bool(false));
        assert!(trig.process_bool(true));
        assert!(!trig.process_bool(true));
        assert!(!trig.process_bool(false));
        assert!(trig.process_bool(true));
    }

    #[test]
    fn pulse_lasts_requested_duration() {
        let mut pulse = PulseGen::new();
        let sample_time = 1.0 / 1000.0;
        pulse.trigger(5.0 * sample_time);
        let mut high = 0;
        for _ in 0..10 {
            if pulse.process(sample_time) {
                high += 1;
            }
        }
        assert_eq!(high, 5);
    }

    #[test]
    fn retrigger_extends_not_queues() {
        let mut pulse = PulseGen::new();
        let st = 0.001;
        pulse.trigger(0.002);
        assert!(pulse.process(st));
        pulse.trigger(0.003);
        let mut high = 0;
        for _ in 0..10 {
            if pulse.process(st) {
                high += 1;
            }
        }
        assert_eq!(high, 3);
    }
}
