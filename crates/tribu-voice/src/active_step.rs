//! Momentary active-step override.
//!
//! While the ACTIVE STEP button is held, the performer edits a *preview*
//! of the pattern: a snapshot of the sequencer's step enables and the
//! drum patterns is taken on press, toggles apply to the snapshot only,
//! and the stored sequence comes back untouched on release. While held,
//! the snapshot gates the synth steps and drives the drum triggers.

use tribu_seq::Sequencer;

/// Snapshot-based pattern preview.
#[derive(Debug, Clone)]
pub struct ActiveStepOverride {
    engaged: bool,
    /// Preview of each logical step's enable (true = audible).
    steps: [bool; 16],
    /// Preview of the three 8-slot drum patterns.
    drum_patterns: [[bool; 8]; 3],
}

impl Default for ActiveStepOverride {
    fn default() -> Self {
        Self {
            engaged: false,
            steps: [false; 16],
            drum_patterns: [[false; 8]; 3],
        }
    }
}

impl ActiveStepOverride {
    /// Create a disengaged override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the override is currently held.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Take the snapshot on button press.
    pub fn engage(&mut self, sequencer: &Sequencer, drum_patterns: &[[bool; 8]; 3]) {
        self.engaged = true;
        let count = sequencer.step_count();
        for i in 0..16 {
            self.steps[i] = i < count && !sequencer.is_step_skipped(i);
        }
        self.drum_patterns = *drum_patterns;
    }

    /// Drop the preview on button release.
    pub fn release(&mut self) {
        self.engaged = false;
    }

    /// Toggle a logical step in the preview.
    pub fn toggle_step(&mut self, index: usize) {
        if index < 16 {
            self.steps[index] = !self.steps[index];
        }
    }

    /// Whether a logical step is enabled in the preview; out of range
    /// reads false.
    pub fn step_enabled(&self, index: usize) -> bool {
        index < 16 && self.steps[index]
    }

    /// Toggle a drum pattern slot in the preview.
    pub fn toggle_drum(&mut self, drum: usize, slot: usize) {
        if drum < 3 && slot < 8 {
            self.drum_patterns[drum][slot] = !self.drum_patterns[drum][slot];
        }
    }

    /// Read a drum pattern slot from the preview; out of range reads
    /// false.
    pub fn drum(&self, drum: usize, slot: usize) -> bool {
        drum < 3 && slot < 8 && self.drum_patterns[drum][slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_sequencer_enables() {
        let mut seq = Sequencer::new();
        seq.set_step_skipped(2, true);
        let patterns = [[false; 8]; 3];
        let mut preview = ActiveStepOverride::new();
        preview.engage(&seq, &patterns);
        assert!(preview.step_enabled(0));
        assert!(!preview.step_enabled(2));
        // 8-step mode: logical steps 8..16 are disabled in the preview.
        assert!(!preview.step_enabled(9));
    }

    #[test]
    fn toggles_do_not_touch_the_source() {
        let seq = Sequencer::new();
        let patterns = [[true; 8]; 3];
        let mut preview = ActiveStepOverride::new();
        preview.engage(&seq, &patterns);
        preview.toggle_step(0);
        preview.toggle_drum(1, 3);
        assert!(!preview.step_enabled(0));
        assert!(!preview.drum(1, 3));
        // The inputs are unchanged by construction (immutable borrows);
        // release drops the preview entirely.
        preview.release();
        assert!(!preview.is_engaged());
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut preview = ActiveStepOverride::new();
        preview.toggle_step(40);
        preview.toggle_drum(5, 1);
        assert!(!preview.step_enabled(40));
        assert!(!preview.drum(5, 1));
    }
}
