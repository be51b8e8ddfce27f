//! The step-pattern state machine.
//!
//! Timing model: in internal-clock mode a per-sample accumulator advances
//! the playhead whenever it reaches `step_duration` (subtracting rather
//! than resetting, so long runs do not drift). In external-sync mode the
//! playhead advances on rising edges of the sync input and the
//! accumulator only measures progress within the step, against an assumed
//! 100 ms step width for gate-time math.
//!
//! Invariants: `current_step` is always inside `[0, step_count)`,
//! `step_count` is 8 or 16, and flux-buffer writes are bounds-checked.
//! If every step is skipped, step 0 is force-unskipped before advancing —
//! the sequencer can never livelock.

use tribu_core::trigger::GateTrigger;

/// Physical step capacity (16-step mode).
pub const MAX_STEPS: usize = 16;
/// Flux gesture buffer capacity: 16 steps × 100 samples.
pub const FLUX_BUFFER_SIZE: usize = 1600;
/// Flux capture resolution per step.
pub const FLUX_SAMPLES_PER_STEP: usize = 100;
/// Assumed step width for gate-time math under external sync, seconds.
pub const EXTERNAL_STEP_WIDTH: f32 = 0.1;

/// Gate output level while a step's gate is open, volts-like.
pub const GATE_HIGH: f32 = 5.0;

/// One sequencer step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Skipped steps are passed over entirely by the playhead.
    pub skipped: bool,
    /// Muted steps keep their slot time but output zero pitch and gate.
    pub muted: bool,
    /// Pitch in volts-like units (1/octave).
    pub pitch: f32,
    /// Recorded gate level, volts-like.
    pub gate: f32,
    /// Fraction of the step duration the gate stays high, in [0.1, 1.0].
    pub gate_time: f32,
    /// Accent flag, scales the hit downstream.
    pub accent: bool,
    /// Glide flag: pitch slews toward this step instead of jumping.
    pub glide: bool,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            skipped: false,
            muted: false,
            pitch: 0.0,
            gate: 0.0,
            gate_time: 0.5,
            accent: false,
            glide: false,
        }
    }
}

/// Per-sample sequencer output.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequencerOutput {
    /// Pitch CV for the oscillator, volts-like.
    pub pitch: f32,
    /// Gate output, `GATE_HIGH` or 0.0.
    pub gate: f32,
    /// True on exactly the sample where the playhead moved.
    pub step_changed: bool,
    /// Current playhead position.
    pub step: usize,
    /// Accent flag of the sounding step.
    pub accent: bool,
    /// Glide flag of the sounding step.
    pub glide: bool,
}

/// The extended 8/16-step sequencer.
#[derive(Debug, Clone)]
pub struct Sequencer {
    steps: [Step; MAX_STEPS],
    flux_buffer: [f32; FLUX_BUFFER_SIZE],
    flux_sample_count: usize,

    current_step: usize,
    recording_step: usize,
    step_duration: f32,
    step_timer: f32,

    glide_pitch: f32,
    glide_active: bool,

    playing: bool,
    recording: bool,
    flux_mode: bool,
    external_sync: bool,
    sixteen_step_mode: bool,

    sync_trigger: GateTrigger,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Create a stopped 8-step sequencer at 120 BPM.
    pub fn new() -> Self {
        Self {
            steps: [Step::default(); MAX_STEPS],
            flux_buffer: [0.0; FLUX_BUFFER_SIZE],
            flux_sample_count: 0,
            current_step: 0,
            recording_step: 0,
            step_duration: 0.125,
            step_timer: 0.0,
            glide_pitch: 0.0,
            glide_active: false,
            playing: false,
            recording: false,
            flux_mode: false,
            external_sync: false,
            sixteen_step_mode: false,
            sync_trigger: GateTrigger::new(),
        }
    }

    // ---- Transport ----

    /// Start playback from step 0.
    pub fn play(&mut self) {
        self.playing = true;
        self.current_step = 0;
        self.step_timer = 0.0;
    }

    /// Stop playback and rewind to step 0.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current_step = 0;
        self.step_timer = 0.0;
    }

    /// Whether the transport is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Arm recording. In flux mode this clears the gesture buffer so the
    /// new take starts clean.
    pub fn start_recording(&mut self) {
        self.recording = true;
        self.recording_step = 0;
        if self.flux_mode {
            self.flux_sample_count = 0;
        }
    }

    /// Disarm recording.
    pub fn stop_recording(&mut self) {
        self.recording = false;
    }

    /// Whether recording is armed.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Engage or release flux (continuous gesture) recording mode.
    pub fn set_flux_mode(&mut self, flux: bool) {
        self.flux_mode = flux;
    }

    /// Whether flux mode is engaged.
    pub fn flux_mode(&self) -> bool {
        self.flux_mode
    }

    /// Set tempo in BPM; steps are 16th notes. BPM is clamped to a sane
    /// playable range.
    pub fn set_tempo(&mut self, bpm: f32) {
        let bpm = bpm.clamp(1.0, 1200.0);
        self.step_duration = 60.0 / (bpm * 4.0);
    }

    /// Current step duration in seconds.
    pub fn step_duration(&self) -> f32 {
        self.step_duration
    }

    /// Switch between internal clock and external sync advancement.
    pub fn set_external_sync(&mut self, external: bool) {
        self.external_sync = external;
    }

    /// Whether external sync drives the playhead.
    pub fn external_sync(&self) -> bool {
        self.external_sync
    }

    // ---- Step layout ----

    /// Switch between 8 and 16 logical steps. The playhead and recording
    /// cursor are pulled back in range when shrinking.
    pub fn set_sixteen_step_mode(&mut self, sixteen: bool) {
        self.sixteen_step_mode = sixteen;
        let count = self.step_count();
        if self.current_step >= count {
            self.current_step = 0;
        }
        if self.recording_step >= count {
            self.recording_step = 0;
        }
    }

    /// Whether 16-step mode is engaged.
    pub fn sixteen_step_mode(&self) -> bool {
        self.sixteen_step_mode
    }

    /// Number of logical steps: 8 or 16.
    pub fn step_count(&self) -> usize {
        if self.sixteen_step_mode { 16 } else { 8 }
    }

    /// Map a physical button (0–7) to its logical step index. In 16-step
    /// mode each button addresses a (main, sub) pair: `2n` and `2n + 1`.
    pub fn step_index(&self, button: usize, sub_step: bool) -> usize {
        if !self.sixteen_step_mode {
            button
        } else {
            button * 2 + usize::from(sub_step)
        }
    }

    /// Current playhead position.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Stopped-mode recording cursor position.
    pub fn recording_step(&self) -> usize {
        self.recording_step
    }

    // ---- Step accessors (bounds-checked; out of range is a no-op) ----

    /// Full 16-step backing storage, regardless of the current mode.
    /// Serializers persist all 16 slots so an 8-step patch keeps its
    /// hidden sub-steps.
    pub fn steps(&self) -> &[Step; MAX_STEPS] {
        &self.steps
    }

    /// Read a step; out-of-range indices return a default step.
    pub fn step(&self, index: usize) -> Step {
        if index < self.step_count() {
            self.steps[index]
        } else {
            Step::default()
        }
    }

    /// Overwrite a step wholesale (patch loading).
    pub fn set_step(&mut self, index: usize, step: Step) {
        if index < MAX_STEPS {
            self.steps[index] = step;
            self.steps[index].gate_time = step.gate_time.clamp(0.1, 1.0);
        }
    }

    /// Set a step's skipped flag.
    pub fn set_step_skipped(&mut self, index: usize, skipped: bool) {
        if index < self.step_count() {
            self.steps[index].skipped = skipped;
        }
    }

    /// Read a step's skipped flag; out of range reads false.
    pub fn is_step_skipped(&self, index: usize) -> bool {
        index < self.step_count() && self.steps[index].skipped
    }

    /// Toggle a step's skipped flag.
    pub fn toggle_step_skipped(&mut self, index: usize) {
        if index < self.step_count() {
            self.steps[index].skipped = !self.steps[index].skipped;
        }
    }

    /// Set a step's muted flag.
    pub fn set_step_muted(&mut self, index: usize, muted: bool) {
        if index < self.step_count() {
            self.steps[index].muted = muted;
        }
    }

    /// Read a step's muted flag; out of range reads false.
    pub fn is_step_muted(&self, index: usize) -> bool {
        index < self.step_count() && self.steps[index].muted
    }

    /// Set a step's accent flag.
    pub fn set_step_accent(&mut self, index: usize, accent: bool) {
        if index < self.step_count() {
            self.steps[index].accent = accent;
        }
    }

    /// Read a step's accent flag; out of range reads false.
    pub fn is_step_accent(&self, index: usize) -> bool {
        index < self.step_count() && self.steps[index].accent
    }

    /// Set a step's glide flag.
    pub fn set_step_glide(&mut self, index: usize, glide: bool) {
        if index < self.step_count() {
            self.steps[index].glide = glide;
        }
    }

    /// Read a step's glide flag; out of range reads false.
    pub fn is_step_glide(&self, index: usize) -> bool {
        index < self.step_count() && self.steps[index].glide
    }

    /// Set a step's gate time, clamped to [0.1, 1.0].
    pub fn set_step_gate_time(&mut self, index: usize, gate_time: f32) {
        if index < self.step_count() {
            self.steps[index].gate_time = gate_time.clamp(0.1, 1.0);
        }
    }

    /// Read a step's gate time; out of range reads the neutral 0.5.
    pub fn step_gate_time(&self, index: usize) -> f32 {
        if index < self.step_count() {
            self.steps[index].gate_time
        } else {
            0.5
        }
    }

    /// Un-skip every step.
    pub fn enable_all_steps(&mut self) {
        let count = self.step_count();
        for step in &mut self.steps[..count] {
            step.skipped = false;
        }
    }

    /// Restore the default pattern: all steps audible with full gates,
    /// flux buffer emptied, flux mode released.
    pub fn clear(&mut self) {
        let count = self.step_count();
        for step in &mut self.steps[..count] {
            *step = Step {
                gate: GATE_HIGH,
                gate_time: 0.8,
                ..Step::default()
            };
        }
        self.flux_sample_count = 0;
        self.flux_mode = false;
        self.flux_buffer = [0.0; FLUX_BUFFER_SIZE];
    }

    // ---- Recording ----

    /// Record a note to the playhead step (used while playing). No-op
    /// unless recording in normal (non-flux) mode.
    pub fn record_note(&mut self, pitch: f32, gate: f32, gate_time: f32) {
        if self.recording && !self.flux_mode {
            self.write_note(self.current_step, pitch, gate, gate_time);
        }
    }

    /// Record a note to an explicit step. No-op unless recording in
    /// normal mode or the index is out of range.
    pub fn record_note_to_step(&mut self, index: usize, pitch: f32, gate: f32, gate_time: f32) {
        if self.recording && !self.flux_mode {
            self.write_note(index, pitch, gate, gate_time);
        }
    }

    /// Stopped-transport recording: write to the recording cursor
    /// (skipping skipped steps, self-healing if all are skipped) and
    /// advance it.
    pub fn record_note_advance(&mut self, pitch: f32, gate: f32, gate_time: f32) {
        if !self.recording || self.flux_mode {
            return;
        }
        let count = self.step_count();
        let mut target = self.recording_step;
        for _ in 0..count {
            if !self.steps[target].skipped {
                break;
            }
            target = (target + 1) % count;
        }
        if self.steps[target].skipped {
            // Every step was skipped; heal at step 0.
            self.steps[0].skipped = false;
            target = 0;
        }
        self.write_note(target, pitch, gate, gate_time);
        self.recording_step = (target + 1) % count;
    }

    fn write_note(&mut self, index: usize, pitch: f32, gate: f32, gate_time: f32) {
        if index < self.step_count() {
            let step = &mut self.steps[index];
            step.pitch = pitch;
            step.gate = gate;
            step.gate_time = gate_time.clamp(0.1, 1.0);
            step.skipped = false;
            step.muted = false;
        }
    }

    /// Capture one flux sample. While playing, samples land at the slot
    /// matching the playhead position (about 100 per step); while
    /// stopped they append until the buffer is full. No-op unless
    /// recording in flux mode.
    pub fn record_flux(&mut self, pitch: f32) {
        if !self.recording || !self.flux_mode {
            return;
        }
        if self.playing {
            let progress = (self.step_timer / self.step_duration).clamp(0.0, 1.0);
            let index = self.current_step * FLUX_SAMPLES_PER_STEP
                + (progress * FLUX_SAMPLES_PER_STEP as f32) as usize;
            let max = self.step_count() * FLUX_SAMPLES_PER_STEP;
            if index < max && index < FLUX_BUFFER_SIZE {
                self.flux_buffer[index] = pitch;
                self.flux_sample_count = self.flux_sample_count.max(index + 1);
            }
        } else if self.flux_sample_count < FLUX_BUFFER_SIZE {
            self.flux_buffer[self.flux_sample_count] = pitch;
            self.flux_sample_count += 1;
        }
    }

    /// Number of flux samples captured so far.
    pub fn flux_sample_count(&self) -> usize {
        self.flux_sample_count
    }

    // ---- Processing ----

    /// Advance by one sample.
    ///
    /// `sync_signal` is the external sync input voltage (edges matter
    /// only in external-sync mode), `ribbon_gate_time_mod` scales each
    /// step's gate time (0.5 is neutral), and `accent_glide_amount`
    /// enables and paces portamento on glide steps.
    pub fn process(
        &mut self,
        sample_time: f32,
        sync_signal: f32,
        ribbon_gate_time_mod: f32,
        accent_glide_amount: f32,
    ) -> SequencerOutput {
        let mut output = SequencerOutput::default();
        if !self.playing {
            return output;
        }

        // Forward-progress guarantee: a fully skipped pattern heals
        // itself rather than livelocking the advance search.
        if self.all_steps_skipped() {
            self.steps[0].skipped = false;
        }

        let mut advanced = false;
        if self.external_sync {
            if self.sync_trigger.process(sync_signal) {
                let next = self.next_active_step(self.current_step);
                advanced = next != self.current_step;
                self.current_step = next;
                self.step_timer = 0.0;
            }
            self.step_timer += sample_time;
        } else {
            self.step_timer += sample_time;
            if self.step_timer >= self.step_duration {
                self.step_timer -= self.step_duration;
                let next = self.next_active_step(self.current_step);
                advanced = next != self.current_step;
                self.current_step = next;
            }
        }

        output.step = self.current_step;
        output.step_changed = advanced;

        let step = self.steps[self.current_step];
        if step.skipped || step.muted {
            // Keep slot time but emit nothing. (A skipped current step can
            // only happen when the user skips it mid-step.)
            return output;
        }

        output.accent = step.accent;
        output.glide = step.glide;
        output.pitch = self.flux_or_step_pitch(step);

        // Portamento: slew toward the target pitch instead of jumping.
        // The slew state survives across steps and re-anchors whenever a
        // non-glide step plays.
        if step.glide && accent_glide_amount > 0.0 {
            if self.glide_active {
                let speed = accent_glide_amount.clamp(0.0, 1.0);
                self.glide_pitch += (output.pitch - self.glide_pitch) * speed;
            } else {
                self.glide_pitch = output.pitch;
                self.glide_active = true;
            }
            output.pitch = self.glide_pitch;
        } else {
            self.glide_pitch = output.pitch;
            self.glide_active = true;
        }

        let effective_gate_time = (step.gate_time * ribbon_gate_time_mod).clamp(0.1, 1.0);
        let step_progress = if self.external_sync {
            self.step_timer / EXTERNAL_STEP_WIDTH
        } else {
            self.step_timer / self.step_duration
        };
        output.gate = if step_progress < effective_gate_time {
            GATE_HIGH
        } else {
            0.0
        };

        output
    }

    fn all_steps_skipped(&self) -> bool {
        self.steps[..self.step_count()].iter().all(|s| s.skipped)
    }

    fn next_active_step(&self, from: usize) -> usize {
        let count = self.step_count();
        let mut next = (from + 1) % count;
        for _ in 0..count {
            if !self.steps[next].skipped {
                return next;
            }
            next = (next + 1) % count;
        }
        from
    }

    fn flux_or_step_pitch(&self, step: Step) -> f32 {
        if self.flux_mode && self.flux_sample_count > 0 {
            // Replay divides the filled region evenly across the steps
            // and indexes proportionally to progress within the step.
            let samples_per_step = self.flux_sample_count / self.step_count();
            if samples_per_step > 0 {
                let offset = self.current_step * samples_per_step;
                let progress = (self.step_timer / self.step_duration).clamp(0.0, 1.0);
                let index = offset + (progress * samples_per_step as f32) as usize;
                if index < self.flux_sample_count {
                    return self.flux_buffer[index];
                }
            }
        }
        step.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1/1024 s is exact in binary, so summing it never drifts: 128
    /// samples make exactly 0.125 s.
    const EXACT_ST: f32 = 1.0 / 1024.0;

    fn playing_sequencer() -> Sequencer {
        let mut seq = Sequencer::new();
        seq.set_tempo(120.0); // step_duration = 0.125 s
        seq.play();
        seq
    }

    #[test]
    fn step_advance_is_exact_over_one_step_duration() {
        let mut seq = playing_sequencer();
        let mut changes = 0;
        for _ in 0..128 {
            if seq.process(EXACT_ST, 0.0, 0.5, 0.0).step_changed {
                changes += 1;
            }
        }
        assert_eq!(changes, 1, "exactly one advance per step duration");
        assert_eq!(seq.current_step(), 1);
    }

    #[test]
    fn eight_triggers_per_second_at_120_bpm() {
        let mut seq = playing_sequencer();
        let st = 1.0 / 44100.0;
        let mut changes = 0;
        for _ in 0..44110 {
            if seq.process(st, 0.0, 0.5, 0.0).step_changed {
                changes += 1;
            }
        }
        assert_eq!(changes, 8, "120 BPM 16ths = 8 steps per second");
    }

    #[test]
    fn record_readback_roundtrip_is_lossless() {
        let mut seq = Sequencer::new();
        seq.start_recording();
        seq.record_note_to_step(3, 0.4375, 5.0, 0.8);
        let step = seq.step(3);
        assert_eq!(step.pitch, 0.4375);
        assert_eq!(step.gate, 5.0);
        assert_eq!(step.gate_time, 0.8);
        assert!(!step.skipped);
        assert!(!step.muted);
    }

    #[test]
    fn all_skipped_recovers_via_step_zero() {
        let mut seq = playing_sequencer();
        for i in 0..seq.step_count() {
            seq.set_step_skipped(i, true);
        }
        let out = seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        assert!(!seq.is_step_skipped(0), "step 0 must be force-unskipped");
        assert!(out.step < seq.step_count());
        // And playback keeps advancing.
        let mut changes = 0;
        for _ in 0..1024 {
            if seq.process(EXACT_ST, 0.0, 0.5, 0.0).step_changed {
                changes += 1;
            }
        }
        assert!(changes > 0, "playback must continue after recovery");
    }

    #[test]
    fn sixteen_step_index_mapping() {
        let mut seq = Sequencer::new();
        seq.set_sixteen_step_mode(true);
        for n in 0..8 {
            assert_eq!(seq.step_index(n, false), 2 * n);
            assert_eq!(seq.step_index(n, true), 2 * n + 1);
        }
        seq.set_sixteen_step_mode(false);
        for n in 0..8 {
            assert_eq!(seq.step_index(n, false), n);
        }
    }

    #[test]
    fn skipped_steps_are_passed_over() {
        let mut seq = playing_sequencer();
        seq.set_step_skipped(1, true);
        seq.set_step_skipped(2, true);
        // Run one full step duration: playhead should land on 3.
        for _ in 0..128 {
            seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        }
        assert_eq!(seq.current_step(), 3);
    }

    #[test]
    fn muted_step_advances_but_stays_silent() {
        let mut seq = playing_sequencer();
        for i in 0..8 {
            seq.set_step(
                i,
                Step {
                    pitch: 1.0,
                    gate: GATE_HIGH,
                    gate_time: 1.0,
                    ..Step::default()
                },
            );
        }
        seq.set_step_muted(1, true);
        // Move into step 1.
        for _ in 0..128 {
            seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        }
        assert_eq!(seq.current_step(), 1);
        let out = seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        assert_eq!(out.gate, 0.0);
        assert_eq!(out.pitch, 0.0);
        // Playhead still leaves the muted step on schedule.
        for _ in 0..128 {
            seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        }
        assert_eq!(seq.current_step(), 2);
    }

    #[test]
    fn gate_follows_gate_time_fraction() {
        let mut seq = playing_sequencer();
        for i in 0..8 {
            seq.set_step(
                i,
                Step {
                    gate: GATE_HIGH,
                    gate_time: 0.5,
                    ..Step::default()
                },
            );
        }
        // Neutral ribbon mod of 0.5 → effective gate time 0.25 of a step.
        let mut high = 0;
        for _ in 0..128 {
            let out = seq.process(EXACT_ST, 0.0, 0.5, 0.0);
            if out.gate > 0.0 {
                high += 1;
            }
        }
        assert!(
            (28..=36).contains(&high),
            "expected gate high for ~32 of 128 samples, got {high}"
        );
    }

    #[test]
    fn gate_time_mod_is_clamped_to_floor() {
        let mut seq = playing_sequencer();
        seq.set_step_gate_time(0, 1.0);
        // Ribbon mod 0.01 would make gate time 0.01; clamp floor is 0.1.
        let mut high = 0;
        for _ in 0..128 {
            let out = seq.process(EXACT_ST, 0.0, 0.01, 0.0);
            if out.gate > 0.0 {
                high += 1;
            }
        }
        assert!(
            (10..=16).contains(&high),
            "gate floor of 0.1 should keep ~13 samples high, got {high}"
        );
    }

    #[test]
    fn external_sync_advances_on_edges_only() {
        let mut seq = playing_sequencer();
        seq.set_external_sync(true);
        let st = 1.0 / 44100.0;

        // No edges: no advancement however long we run.
        for _ in 0..10_000 {
            assert!(!seq.process(st, 0.0, 0.5, 0.0).step_changed);
        }
        assert_eq!(seq.current_step(), 0);

        // One rising edge per call block advances one step.
        for expected in [1usize, 2, 3] {
            let out = seq.process(st, 5.0, 0.5, 0.0);
            assert!(out.step_changed);
            assert_eq!(out.step, expected);
            // Held-high sync must not retrigger.
            for _ in 0..100 {
                assert!(!seq.process(st, 5.0, 0.5, 0.0).step_changed);
            }
            for _ in 0..100 {
                seq.process(st, 0.0, 0.5, 0.0);
            }
        }
    }

    #[test]
    fn glide_slews_instead_of_jumping() {
        let mut seq = playing_sequencer();
        seq.set_step(
            0,
            Step {
                pitch: 0.0,
                gate: GATE_HIGH,
                gate_time: 1.0,
                ..Step::default()
            },
        );
        seq.set_step(
            1,
            Step {
                pitch: 1.0,
                gate: GATE_HIGH,
                gate_time: 1.0,
                glide: true,
                ..Step::default()
            },
        );
        // Play through step 0 to anchor the glide state at 0.0.
        for _ in 0..128 {
            seq.process(EXACT_ST, 0.0, 0.5, 0.1);
        }
        assert_eq!(seq.current_step(), 1);
        let first = seq.process(EXACT_ST, 0.0, 0.5, 0.1);
        assert!(
            first.pitch < 0.5,
            "glide should approach 1.0 gradually, got {}",
            first.pitch
        );
        let mut last = first.pitch;
        for _ in 0..100 {
            let out = seq.process(EXACT_ST, 0.0, 0.5, 0.1);
            assert!(out.pitch >= last - 1e-6, "glide must be monotonic");
            last = out.pitch;
        }
        assert!(last > first.pitch, "glide must make progress");
    }

    #[test]
    fn glide_without_amount_jumps() {
        let mut seq = playing_sequencer();
        seq.set_step(
            1,
            Step {
                pitch: 1.0,
                gate: GATE_HIGH,
                gate_time: 1.0,
                glide: true,
                ..Step::default()
            },
        );
        for _ in 0..128 {
            seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        }
        let out = seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        assert_eq!(out.pitch, 1.0, "zero glide amount disables portamento");
    }

    #[test]
    fn flux_append_when_stopped_and_replay() {
        let mut seq = Sequencer::new();
        seq.set_flux_mode(true);
        seq.start_recording();
        // Fill the whole buffer with a ramp while stopped.
        for i in 0..FLUX_BUFFER_SIZE + 100 {
            seq.record_flux(i as f32 / FLUX_BUFFER_SIZE as f32);
        }
        assert_eq!(seq.flux_sample_count(), FLUX_BUFFER_SIZE);

        seq.stop_recording();
        seq.set_tempo(120.0);
        seq.play();
        // Replay: pitch should rise over the cycle following the ramp.
        let mut first = None;
        let mut last = 0.0;
        for _ in 0..1024 {
            let out = seq.process(EXACT_ST, 0.0, 0.5, 0.0);
            if first.is_none() && out.gate > 0.0 {
                first = Some(out.pitch);
            }
            last = out.pitch;
        }
        assert!(last > first.unwrap_or(0.0), "flux replay should follow the ramp");
    }

    #[test]
    fn flux_write_is_bounds_checked() {
        let mut seq = Sequencer::new();
        seq.set_flux_mode(true);
        seq.start_recording();
        for _ in 0..(FLUX_BUFFER_SIZE * 2) {
            seq.record_flux(1.0);
        }
        assert_eq!(seq.flux_sample_count(), FLUX_BUFFER_SIZE);
    }

    #[test]
    fn stopped_recording_cursor_advances_and_skips() {
        let mut seq = Sequencer::new();
        seq.start_recording();
        seq.set_step_skipped(1, true);
        seq.record_note_advance(0.1, 5.0, 0.8);
        seq.record_note_advance(0.2, 5.0, 0.8);
        // Cursor path: 0, then skipping 1, lands on 2.
        assert_eq!(seq.step(0).pitch, 0.1);
        assert_eq!(seq.step(2).pitch, 0.2);
        assert!(seq.is_step_skipped(1));
    }

    #[test]
    fn stopped_recording_heals_all_skipped() {
        let mut seq = Sequencer::new();
        seq.start_recording();
        for i in 0..8 {
            seq.set_step_skipped(i, true);
        }
        seq.record_note_advance(0.7, 5.0, 0.8);
        assert!(!seq.is_step_skipped(0));
        assert_eq!(seq.step(0).pitch, 0.7);
    }

    #[test]
    fn clear_restores_default_pattern() {
        let mut seq = Sequencer::new();
        seq.start_recording();
        seq.record_note_to_step(2, 0.9, 5.0, 0.3);
        seq.set_step_skipped(4, true);
        seq.set_flux_mode(true);
        seq.clear();
        for i in 0..8 {
            let step = seq.step(i);
            assert!(!step.skipped);
            assert_eq!(step.pitch, 0.0);
            assert_eq!(step.gate, GATE_HIGH);
            assert_eq!(step.gate_time, 0.8);
        }
        assert!(!seq.flux_mode());
        assert_eq!(seq.flux_sample_count(), 0);
    }

    #[test]
    fn out_of_range_accessors_are_no_ops() {
        let mut seq = Sequencer::new();
        seq.set_step_skipped(12, true); // 8-step mode: index 12 invalid
        assert!(!seq.is_step_skipped(12));
        seq.set_step_gate_time(99, 1.0);
        assert_eq!(seq.step_gate_time(99), 0.5);
        seq.set_step_accent(200, true);
        assert!(!seq.is_step_accent(200));
    }

    #[test]
    fn playing_recording_writes_to_playhead() {
        let mut seq = playing_sequencer();
        seq.start_recording();
        for _ in 0..128 {
            seq.process(EXACT_ST, 0.0, 0.5, 0.0);
        }
        assert_eq!(seq.current_step(), 1);
        seq.record_note(0.25, 5.0, 0.8);
        assert_eq!(seq.step(1).pitch, 0.25);
    }
}
