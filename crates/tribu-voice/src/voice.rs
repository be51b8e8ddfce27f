//! The per-sample voice orchestrator.
//!
//! [`Voice::process`] runs once per audio sample inside the host's
//! real-time callback: it reads the control frame, updates the
//! sequencer and ribbon state, derives oscillator pitch / filter cutoff
//! / envelope timing, pulls one sample through the
//! oscillator → filter → VCA → distortion → delay chain, mixes in the
//! drum voices and writes the output frame. No allocation, no locking,
//! no panics — every numeric hazard is clamped or healed locally.
//!
//! Discrete events (buttons, gate and sync edges) are detected by
//! explicit previous-value comparison; each detector is a named field on
//! this struct, never hidden static state.

use crate::active_step::ActiveStepOverride;
use crate::controls::{ControlFrame, DrumPart, LfoTarget, TempoRange};
use crate::delay::Delay;
use crate::distortion::Distortion;
use crate::param_cache::ParameterCache;
use tribu_core::{
    DcBlocker, Envelope, EnvelopeShape, FilterBank, FilterTopology, GateTrigger, Lfo,
    NoiseGenerator, NoiseType, PulseGen, Vco,
};
use tribu_drums::{DrumKit, DrumKitStyle};
use tribu_seq::{Ribbon, Sequencer};

/// Voltage-like outputs for one sample, all clamped to ±10.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceFrame {
    /// Main mix output (synth + drums).
    pub audio: f32,
    /// Pitch CV actually driving the oscillator.
    pub cv: f32,
    /// Effective gate.
    pub gate: f32,
    /// Sync output: passthrough when externally clocked, 1 ms pulses per
    /// step otherwise.
    pub sync: f32,
    /// Synth-only output (pre drum mix).
    pub synth: f32,
    /// Kick drum individual output.
    pub kick: f32,
    /// Snare individual output.
    pub snare: f32,
    /// Hi-hat individual output.
    pub hihat: f32,
}

/// The complete monophonic voice: synth engine, sequencer, drum machine
/// and post chain, wired for one `process` call per audio sample.
#[derive(Debug)]
pub struct Voice {
    sample_rate: f32,

    // Signal chain
    vco: Vco,
    filters: FilterBank,
    envelope: Envelope,
    lfo: Lfo,
    noise: NoiseGenerator,
    distortion: Distortion,
    delay: Delay,
    dc_post_vca: DcBlocker,
    dc_post_dist: DcBlocker,
    dc_final: DcBlocker,

    // Sequencing
    sequencer: Sequencer,
    ribbon: Ribbon,
    drums: DrumKit,
    drum_patterns: [[bool; 8]; 3],
    active_step: ActiveStepOverride,

    // Control state
    params: ParameterCache,
    selected_part: DrumPart,
    selected_edit_step: usize,
    tempo_range: TempoRange,
    gate_times_locked: bool,
    sync_half_tempo: bool,
    sync_divide_counter: u32,
    roll_timer: f32,
    gate_active: bool,
    active_step_was_held: bool,

    // Edge detectors
    play_trigger: GateTrigger,
    rec_trigger: GateTrigger,
    flux_trigger: GateTrigger,
    part_triggers: [GateTrigger; 4],
    step_triggers: [GateTrigger; 8],
    gate_trigger: GateTrigger,
    ribbon_gate_trigger: GateTrigger,
    sync_half_trigger: GateTrigger,
    sync_pulse: PulseGen,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Voice {
    /// Create a voice at the given sample rate, transport stopped.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            vco: Vco::new(),
            filters: FilterBank::new(sample_rate),
            envelope: Envelope::new(),
            lfo: Lfo::new(),
            noise: NoiseGenerator::new(),
            distortion: Distortion::new(),
            delay: Delay::new(sample_rate),
            dc_post_vca: DcBlocker::new(sample_rate, 30.0),
            dc_post_dist: DcBlocker::new(sample_rate, 15.0),
            dc_final: DcBlocker::new(sample_rate, 10.0),
            sequencer: Sequencer::new(),
            ribbon: Ribbon::new(),
            drums: DrumKit::new(sample_rate),
            drum_patterns: [[false; 8]; 3],
            active_step: ActiveStepOverride::new(),
            params: ParameterCache::new(),
            selected_part: DrumPart::Synth,
            selected_edit_step: 0,
            tempo_range: TempoRange::Full,
            gate_times_locked: false,
            sync_half_tempo: false,
            sync_divide_counter: 0,
            roll_timer: 0.0,
            gate_active: false,
            active_step_was_held: false,
            play_trigger: GateTrigger::new(),
            rec_trigger: GateTrigger::new(),
            flux_trigger: GateTrigger::new(),
            part_triggers: core::array::from_fn(|_| GateTrigger::new()),
            step_triggers: core::array::from_fn(|_| GateTrigger::new()),
            gate_trigger: GateTrigger::new(),
            ribbon_gate_trigger: GateTrigger::new(),
            sync_half_trigger: GateTrigger::new(),
            sync_pulse: PulseGen::new(),
        }
    }

    /// Host-driven sample-rate change. Re-derives every time-constant
    /// coefficient and resizes the delay buffer before the next sample;
    /// callers must not interleave this with `process`.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "voice sample rate changed");
        self.sample_rate = sample_rate;
        self.filters.set_sample_rate(sample_rate);
        self.delay.set_sample_rate(sample_rate);
        self.drums.set_sample_rate(sample_rate);
        self.dc_post_vca.set_sample_rate(sample_rate);
        self.dc_post_dist.set_sample_rate(sample_rate);
        self.dc_final.set_sample_rate(sample_rate);
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Full reset: stop the transport, clear the sequence, flush the
    /// delay and all filter state.
    pub fn reset(&mut self) {
        self.sequencer.stop();
        self.sequencer.stop_recording();
        self.sequencer.clear();
        self.delay.clear();
        self.filters.reset();
        self.envelope.reset();
        self.lfo.reset();
        self.drums.reset();
        self.distortion.reset();
        self.dc_post_vca.reset();
        self.dc_post_dist.reset();
        self.dc_final.reset();
        self.gate_active = false;
        self.roll_timer = 0.0;
        self.sync_divide_counter = 0;
    }

    // ---- Persisted-state accessors ----

    /// The sequencer (steps, transport, mode flags).
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Mutable sequencer access for editing and patch loading.
    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Read a drum pattern slot (drum 0–2, slot 0–7).
    pub fn drum_pattern(&self, drum: usize, slot: usize) -> bool {
        drum < 3 && slot < 8 && self.drum_patterns[drum][slot]
    }

    /// Write a drum pattern slot; out of range is a no-op.
    pub fn set_drum_pattern(&mut self, drum: usize, slot: usize, on: bool) {
        if drum < 3 && slot < 8 {
            self.drum_patterns[drum][slot] = on;
        }
    }

    /// Selected drum kit.
    pub fn drum_kit_style(&self) -> DrumKitStyle {
        self.drums.style()
    }

    /// Select the drum kit.
    pub fn set_drum_kit_style(&mut self, style: DrumKitStyle) {
        self.drums.set_style(style);
    }

    /// Selected filter topology.
    pub fn filter_topology(&self) -> FilterTopology {
        self.filters.topology()
    }

    /// Select the filter topology.
    pub fn set_filter_topology(&mut self, topology: FilterTopology) {
        self.filters.set_topology(topology);
    }

    /// Selected noise color.
    pub fn noise_type(&self) -> NoiseType {
        self.noise.noise_type()
    }

    /// Select the noise color.
    pub fn set_noise_type(&mut self, noise_type: NoiseType) {
        self.noise.set_noise_type(noise_type);
    }

    /// Selected tempo knob range.
    pub fn tempo_range(&self) -> TempoRange {
        self.tempo_range
    }

    /// Select the tempo knob range.
    pub fn set_tempo_range(&mut self, range: TempoRange) {
        self.tempo_range = range;
    }

    /// Whether gate-time modulation is locked out.
    pub fn gate_times_locked(&self) -> bool {
        self.gate_times_locked
    }

    /// Lock or unlock gate-time modulation.
    pub fn set_gate_times_locked(&mut self, locked: bool) {
        self.gate_times_locked = locked;
    }

    /// Whether external sync is divided by two.
    pub fn sync_half_tempo(&self) -> bool {
        self.sync_half_tempo
    }

    /// Enable or disable the external-sync divider.
    pub fn set_sync_half_tempo(&mut self, half: bool) {
        self.sync_half_tempo = half;
    }

    /// Whether the latched LFO sample-and-hold mode is engaged.
    pub fn lfo_sample_hold(&self) -> bool {
        self.lfo.sample_hold_latched()
    }

    /// Engage or release the latched LFO sample-and-hold mode.
    pub fn set_lfo_sample_hold(&mut self, latched: bool) {
        self.lfo.set_sample_hold_latched(latched);
    }

    /// Currently addressed part.
    pub fn selected_part(&self) -> DrumPart {
        self.selected_part
    }

    /// Toggle the sub-step (odd logical index) behind a physical button
    /// in 16-step mode. No-op in 8-step mode.
    pub fn toggle_sub_step(&mut self, button: usize) {
        if self.sequencer.sixteen_step_mode() && button < 8 {
            let index = self.sequencer.step_index(button, true);
            self.sequencer.toggle_step_skipped(index);
        }
    }

    // ---- Per-sample processing ----

    /// Process one audio sample.
    pub fn process(&mut self, sample_time: f32, frame: &ControlFrame) -> VoiceFrame {
        if self.params.needs_update() {
            self.params.refresh(frame);
        }

        self.ribbon.set_range(self.params.ribbon_range);
        self.ribbon.set_octave(self.params.octave);
        self.ribbon.set_position(frame.ribbon_position);
        self.ribbon.set_touching(frame.ribbon_touching);

        self.handle_transport_buttons(frame);
        self.handle_part_buttons(frame);

        // Clock source: the sync jack wins whenever it is patched.
        if frame.sync_in.is_none() {
            self.sequencer
                .set_tempo(self.tempo_range.bpm(self.params.tempo));
            self.sequencer.set_external_sync(false);
        } else {
            self.sequencer.set_external_sync(true);
        }

        self.handle_step_buttons(frame);
        self.handle_active_step(frame);
        self.handle_drum_rolls(sample_time, frame.gate_time_held);

        // Combined gate/pitch source: the ribbon replaces the CV/gate
        // jacks while touched, unless gate-time hold reserves it for
        // modulation duty.
        let input_pitch = frame.cv_pitch + self.params.octave;
        let cv_edge = self.gate_trigger.process(frame.gate);
        let ribbon_edge = self.ribbon_gate_trigger.process(self.ribbon.gate());
        let ribbon_plays = self.ribbon.touching() && !frame.gate_time_held;
        let (final_input_pitch, final_input_gate, gate_triggered) = if ribbon_plays {
            (self.ribbon.cv(), self.ribbon.gate(), cv_edge || ribbon_edge)
        } else {
            (input_pitch, frame.gate, cv_edge)
        };

        if !self.sequencer.is_playing() && gate_triggered {
            self.envelope.trigger();
            self.lfo.gate_retrigger();
            self.gate_active = true;
        }

        let sync_raw = frame.sync_in.unwrap_or(0.0);
        let effective_sync = self.condition_sync(sync_raw);

        let ribbon_gate_time_mod = if self.gate_times_locked {
            0.5
        } else if frame.gate_time_held && self.ribbon.touching() {
            self.ribbon.gate_time_mod()
        } else {
            0.5
        };
        let ribbon_volume = self.ribbon.volume_automation();

        let mut seq_out = self.sequencer.process(
            sample_time,
            effective_sync,
            ribbon_gate_time_mod,
            self.params.accent_glide,
        );

        // Active-step preview gates the synth pattern while held.
        if self.active_step.is_engaged()
            && self.sequencer.is_playing()
            && self.selected_part == DrumPart::Synth
            && !self.active_step.step_enabled(seq_out.step)
        {
            seq_out.gate = 0.0;
        }

        self.handle_recording(final_input_pitch, final_input_gate, gate_triggered);
        self.handle_step_drums(&seq_out);

        // Pitch priority while playing: ribbon touch, then a held
        // external gate, then the sequencer.
        let (final_pitch, final_gate) = if self.sequencer.is_playing() {
            if ribbon_plays {
                (self.ribbon.cv(), seq_out.gate)
            } else if frame.gate > 1.0 {
                (input_pitch, frame.gate.max(seq_out.gate))
            } else {
                (seq_out.pitch, seq_out.gate)
            }
        } else {
            (final_input_pitch, final_input_gate)
        };

        if self.sequencer.is_playing() {
            let step_trigger = seq_out.step_changed && seq_out.gate > 1.0;
            if step_trigger || cv_edge {
                self.envelope.trigger();
                self.lfo.gate_retrigger();
                self.gate_active = true;
            }
        }

        if final_gate < 0.5 && self.gate_active {
            self.envelope.gate_off();
            self.gate_active = false;
        }

        // Idle-part power saving mirrors the panel behavior: with a drum
        // part selected, the synth only stays alive while it is audible.
        let synth_active = self.selected_part == DrumPart::Synth
            || (self.params.volume > 0.01 && self.params.rhythm_volume < 0.99);
        self.vco.set_enabled(synth_active);
        self.filters.set_active(synth_active);
        self.lfo
            .set_active(synth_active && self.params.lfo_intensity > 0.01);

        // LFO routing
        self.lfo.set_mode(self.params.lfo_mode);
        match frame.lfo_rate_cv {
            Some(cv) => self.lfo.set_rate_cv(cv),
            None => self.lfo.set_rate_knob(self.params.lfo_rate),
        }
        let lfo_value = self.lfo.process(sample_time, self.params.lfo_waveform);
        let depth = self.params.lfo_intensity;
        let (pitch_mod, cutoff_mod) = match self.params.lfo_target {
            LfoTarget::Vcf => (0.0, lfo_value * depth * 0.5),
            LfoTarget::VcoAndVcf => (lfo_value * depth * 0.2, lfo_value * depth * 0.5),
            LfoTarget::Vco => (lfo_value * depth * 0.2, 0.0),
        };

        // Oscillator → mix
        self.vco.set_waveform(self.params.vco_waveform);
        self.vco.set_pitch(final_pitch + pitch_mod);
        let vco_out = self.vco.process(sample_time);
        let noise_out = self.noise.process() * self.params.noise_level;
        let mixed = vco_out + noise_out + frame.audio_in * 1.5;

        // Filter
        self.filters
            .set_cutoff((self.params.cutoff + cutoff_mod).clamp(0.0, 1.0));
        self.filters.set_resonance(self.params.resonance);
        let filtered = self.filters.process(mixed);

        // Envelope (GATE shape bypasses the state machine entirely)
        let env_value = match self.params.envelope_shape {
            EnvelopeShape::Gate => {
                if final_gate > 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            shape => {
                shape.configure(&mut self.envelope);
                self.envelope.process(sample_time)
            }
        };

        // VCA with ribbon volume automation (±50%, clamped)
        let volume_mod = (1.0 + ribbon_volume * 0.5).clamp(0.1, 2.0);
        let mut synth_out = filtered * self.params.volume * env_value * volume_mod;
        synth_out = self.dc_post_vca.process(synth_out);

        synth_out = self.apply_distortion(synth_out);

        if self.params.delay_amount > 0.0 && self.params.delay_time > 0.001 {
            synth_out = self.delay.process(
                synth_out,
                sync_raw,
                self.params.delay_time,
                self.params.delay_amount,
            );
        }

        // Drums: one sample from each voice through the shared noise
        // source, in a fixed order so the noise stream stays consistent.
        let mut kick = 0.0;
        let mut snare = 0.0;
        let mut hihat = 0.0;
        let mut drum_mix = 0.0;
        if self.params.rhythm_volume > 0.0 {
            kick = self.drums.process_kick(&mut self.noise);
            snare = self.drums.process_snare(&mut self.noise);
            hihat = self.drums.process_hihat(&mut self.noise);
            drum_mix = (kick * 0.7 + snare * 0.6 + hihat * 0.5) * self.params.rhythm_volume;
        }

        let mix = synth_out * 0.8 + drum_mix;
        let audio = (self.dc_final.process(mix) * 5.0).clamp(-10.0, 10.0);

        let pulse_high = self.sync_pulse.process(sample_time);
        let sync_out = match frame.sync_in {
            Some(v) => v,
            None => {
                if pulse_high {
                    5.0
                } else {
                    0.0
                }
            }
        };

        let rhythm = self.params.rhythm_volume;
        VoiceFrame {
            audio: clamp_output(audio),
            cv: clamp_output(final_pitch),
            gate: clamp_output(final_gate),
            sync: clamp_output(sync_out),
            synth: clamp_output(synth_out * 4.0),
            kick: clamp_output(kick * rhythm * 4.0),
            snare: clamp_output(snare * rhythm * 4.0),
            hihat: clamp_output(hihat * rhythm * 4.0),
        }
    }

    // ---- Button handling ----

    fn handle_transport_buttons(&mut self, frame: &ControlFrame) {
        if self.play_trigger.process_bool(frame.play) {
            if self.sequencer.is_playing() {
                self.sequencer.stop();
            } else {
                self.sequencer.play();
            }
        }

        if self.rec_trigger.process_bool(frame.record) {
            if frame.play {
                // Record pressed while play is held: arm and roll.
                if !self.sequencer.is_recording() {
                    self.sequencer.start_recording();
                    if !self.sequencer.is_playing() {
                        self.sequencer.play();
                    }
                }
            } else if self.sequencer.is_recording() {
                self.sequencer.stop_recording();
            } else {
                self.sequencer.start_recording();
            }
        }

        if self.flux_trigger.process_bool(frame.flux) {
            let flux = !self.sequencer.flux_mode();
            self.sequencer.set_flux_mode(flux);
        }
    }

    fn handle_part_buttons(&mut self, frame: &ControlFrame) {
        for (i, trigger) in self.part_triggers.iter_mut().enumerate() {
            if trigger.process_bool(frame.drum_select[i]) {
                self.selected_part = match i {
                    0 => DrumPart::Synth,
                    1 => DrumPart::Kick,
                    2 => DrumPart::Snare,
                    _ => DrumPart::Hihat,
                };
            }
        }
    }

    fn handle_step_buttons(&mut self, frame: &ControlFrame) {
        for i in 0..8 {
            if !self.step_triggers[i].process_bool(frame.step_buttons[i]) {
                continue;
            }
            self.selected_edit_step = i;
            if frame.gate_time_held {
                self.run_step_command(i);
            } else {
                self.toggle_step_in_current_mode(i);
            }
        }
    }

    /// Gate-time hold turns the step buttons into a command row.
    fn run_step_command(&mut self, button: usize) {
        match button {
            0 => {
                self.sequencer.clear();
                self.drum_patterns = [[false; 8]; 3];
            }
            1 => self.sequencer.clear(),
            2 => self.drum_patterns = [[false; 8]; 3],
            3 => self.sequencer.enable_all_steps(),
            4 => {
                let latched = !self.lfo.sample_hold_latched();
                self.lfo.set_sample_hold_latched(latched);
            }
            5 => {
                let sixteen = !self.sequencer.sixteen_step_mode();
                self.sequencer.set_sixteen_step_mode(sixteen);
            }
            6 => self.gate_times_locked = !self.gate_times_locked,
            7 => self.sync_half_tempo = !self.sync_half_tempo,
            _ => {}
        }
    }

    fn toggle_step_in_current_mode(&mut self, button: usize) {
        match self.selected_part.pattern_index() {
            None => {
                let index = self.sequencer.step_index(button, false);
                if self.active_step.is_engaged() {
                    self.active_step.toggle_step(index);
                } else {
                    self.sequencer.toggle_step_skipped(index);
                }
            }
            Some(drum) => {
                if self.active_step.is_engaged() {
                    self.active_step.toggle_drum(drum, button);
                } else {
                    self.drum_patterns[drum][button] = !self.drum_patterns[drum][button];
                }
            }
        }
    }

    fn handle_active_step(&mut self, frame: &ControlFrame) {
        let held = frame.active_step_held;
        if held && !self.active_step_was_held {
            self.active_step.engage(&self.sequencer, &self.drum_patterns);
            // The hold itself toggles the last-touched step in the preview.
            match self.selected_part.pattern_index() {
                None => {
                    let index = self.sequencer.step_index(self.selected_edit_step, false);
                    self.active_step.toggle_step(index);
                }
                Some(drum) => self.active_step.toggle_drum(drum, self.selected_edit_step),
            }
        } else if !held && self.active_step_was_held {
            self.active_step.release();
        }
        self.active_step_was_held = held;
    }

    fn handle_drum_rolls(&mut self, sample_time: f32, gate_time_held: bool) {
        if gate_time_held && self.ribbon.touching() {
            if let Some(drum) = self.selected_part.pattern_index() {
                let rate = self.ribbon.drum_roll_intensity() * 50.0 + 1.0;
                self.roll_timer += sample_time * rate;
                if self.roll_timer >= 1.0 {
                    self.roll_timer -= 1.0;
                    match drum {
                        0 => self.drums.trigger_kick(0.0),
                        1 => self.drums.trigger_snare(0.0),
                        _ => self.drums.trigger_hihat(0.0),
                    }
                }
                return;
            }
        }
        self.roll_timer = 0.0;
    }

    /// External-sync conditioning: the half-tempo divider passes every
    /// second rising edge through as a clean 5 V trigger.
    fn condition_sync(&mut self, sync_raw: f32) -> f32 {
        if self.sync_half_tempo && self.sequencer.external_sync() {
            if self.sync_half_trigger.process(sync_raw) {
                self.sync_divide_counter += 1;
                if self.sync_divide_counter >= 2 {
                    self.sync_divide_counter = 0;
                    return 5.0;
                }
            }
            0.0
        } else {
            sync_raw
        }
    }

    fn handle_recording(&mut self, pitch: f32, gate: f32, gate_triggered: bool) {
        if !self.sequencer.is_recording() || self.selected_part != DrumPart::Synth {
            return;
        }
        if self.sequencer.flux_mode() {
            if gate > 1.0 {
                self.sequencer.record_flux(pitch);
            }
        } else if gate_triggered {
            let recorded_gate = if gate > 1.0 { gate } else { 5.0 };
            if self.sequencer.is_playing() {
                self.sequencer.record_note(pitch, recorded_gate, 0.8);
            } else {
                self.sequencer.record_note_advance(pitch, recorded_gate, 0.8);
            }
        }
    }

    fn handle_step_drums(&mut self, seq_out: &tribu_seq::SequencerOutput) {
        if !(self.sequencer.is_playing() && seq_out.step_changed) {
            return;
        }

        // Drums read the 8 pattern slots; in 16-step mode only main
        // (even) steps fire, mapped back to their slot.
        let slot = if self.sequencer.sixteen_step_mode() {
            if seq_out.step % 2 == 0 {
                Some(seq_out.step / 2)
            } else {
                None
            }
        } else {
            Some(seq_out.step)
        };

        if let Some(slot) = slot {
            if slot < 8 && !self.sequencer.is_step_skipped(seq_out.step) {
                let accent = if seq_out.accent { 1.0 } else { 0.0 };
                let (kick, snare, hihat) = if self.active_step.is_engaged() {
                    (
                        self.active_step.drum(0, slot),
                        self.active_step.drum(1, slot),
                        self.active_step.drum(2, slot),
                    )
                } else {
                    (
                        self.drum_patterns[0][slot],
                        self.drum_patterns[1][slot],
                        self.drum_patterns[2][slot],
                    )
                };
                if kick {
                    self.drums.trigger_kick(accent);
                }
                if snare {
                    self.drums.trigger_snare(accent);
                }
                if hihat {
                    self.drums.trigger_hihat(accent);
                }
            }
        }

        self.sync_pulse.trigger(1e-3);
    }

    fn apply_distortion(&mut self, synth_out: f32) -> f32 {
        if self.params.distortion <= 0.0 {
            return synth_out;
        }
        let driven = synth_out * (1.0 + self.params.distortion * 2.0);
        let mut distorted = self.distortion.process(driven, self.params.distortion);

        // Loudness guard: if the waveshaper blew the level up more than
        // 3x, squash the excess gently instead of letting the output
        // clamp flatten it.
        let dry_level = synth_out.abs();
        let wet_level = distorted.abs();
        if dry_level > 1e-4 && wet_level > dry_level * 3.0 {
            let excess = wet_level / (dry_level * 2.5);
            let compression = 1.0 + libm::sqrtf(excess.max(1.0) - 1.0) * 0.5;
            distorted /= compression;
        }

        self.dc_post_dist.process(distorted)
    }
}

/// Host outputs are voltage-like and hard-bounded: clamp to ±10 V and
/// guard non-finite values to 0 rather than exporting them.
#[inline]
fn clamp_output(v: f32) -> f32 {
    if v.is_finite() { v.clamp(-10.0, 10.0) } else { 0.0 }
}
