//! Host-facing control bundle and selector enums.
//!
//! [`ControlFrame`] is everything the host hands the voice for one
//! sample: jack voltages, knob positions (normalized unless noted) and
//! momentary button states. The voice performs its own edge detection on
//! the booleans, so hosts simply report the current physical state.

use tribu_core::{EnvelopeShape, LfoMode, LfoWaveform, VcoWaveform};
use tribu_seq::RibbonRange;

/// LFO modulation destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoTarget {
    /// Filter cutoff only.
    #[default]
    Vcf,
    /// Both pitch and cutoff.
    VcoAndVcf,
    /// Oscillator pitch only.
    Vco,
}

impl LfoTarget {
    /// Map a persisted index back to a target. Unknown values fall back
    /// to `Vcf`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::VcoAndVcf,
            2 => Self::Vco,
            _ => Self::Vcf,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Vcf => 0,
            Self::VcoAndVcf => 1,
            Self::Vco => 2,
        }
    }
}

/// Which part the performance buttons currently address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrumPart {
    /// The synth voice itself.
    #[default]
    Synth,
    /// Kick drum pattern.
    Kick,
    /// Snare pattern.
    Snare,
    /// Hi-hat pattern.
    Hihat,
}

impl DrumPart {
    /// Pattern slot for drum parts; `None` for the synth.
    pub fn pattern_index(self) -> Option<usize> {
        match self {
            Self::Synth => None,
            Self::Kick => Some(0),
            Self::Snare => Some(1),
            Self::Hihat => Some(2),
        }
    }
}

/// Selectable tempo knob ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TempoRange {
    /// 10–600 BPM.
    #[default]
    Full,
    /// 20–300 BPM.
    Wide,
    /// 60–180 BPM.
    Narrow,
}

impl TempoRange {
    /// Map a persisted index back to a range. Unknown values fall back
    /// to `Full`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Wide,
            2 => Self::Narrow,
            _ => Self::Full,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Full => 0,
            Self::Wide => 1,
            Self::Narrow => 2,
        }
    }

    /// BPM bounds of this range.
    pub fn bounds(self) -> (f32, f32) {
        match self {
            Self::Full => (10.0, 600.0),
            Self::Wide => (20.0, 300.0),
            Self::Narrow => (60.0, 180.0),
        }
    }

    /// Map the normalized tempo knob through this range.
    pub fn bpm(self, knob: f32) -> f32 {
        let (min, max) = self.bounds();
        min + knob.clamp(0.0, 1.0) * (max - min)
    }
}

/// All external control inputs for one sample.
#[derive(Clone, Debug)]
pub struct ControlFrame {
    // ---- Jacks (volts-like) ----
    /// Pitch CV, 1 V/octave.
    pub cv_pitch: f32,
    /// Gate input; above 1.0 means note-on.
    pub gate: f32,
    /// External audio input mixed before the filter.
    pub audio_in: f32,
    /// Sync input; `None` while the jack is unpatched (internal clock).
    pub sync_in: Option<f32>,
    /// LFO rate CV override; `None` while unpatched (knob-mapped rate).
    pub lfo_rate_cv: Option<f32>,

    // ---- Knobs, normalized [0, 1] unless noted ----
    /// Octave switch in volts, typically -3.0 to +2.0.
    pub octave: f32,
    /// VCA level.
    pub level: f32,
    /// Filter cutoff.
    pub cutoff: f32,
    /// Filter resonance.
    pub resonance: f32,
    /// LFO rate knob.
    pub lfo_rate: f32,
    /// LFO modulation depth.
    pub lfo_intensity: f32,
    /// Noise mix level.
    pub noise_level: f32,
    /// Drum section volume.
    pub rhythm_volume: f32,
    /// Tempo knob (mapped through the selected [`TempoRange`]).
    pub tempo: f32,
    /// Distortion amount.
    pub distortion: f32,
    /// Delay time.
    pub delay_time: f32,
    /// Delay mix/feedback amount.
    pub delay_amount: f32,
    /// Accent/glide amount for sequencer portamento.
    pub accent_glide: f32,

    // ---- Switches ----
    /// Oscillator waveform.
    pub vco_waveform: VcoWaveform,
    /// Envelope shape.
    pub envelope_shape: EnvelopeShape,
    /// LFO mode.
    pub lfo_mode: LfoMode,
    /// LFO waveform.
    pub lfo_waveform: LfoWaveform,
    /// LFO destination.
    pub lfo_target: LfoTarget,
    /// Ribbon range mode.
    pub ribbon_range: RibbonRange,

    // ---- Ribbon ----
    /// Normalized touch position.
    pub ribbon_position: f32,
    /// Whether the ribbon is touched.
    pub ribbon_touching: bool,

    // ---- Momentary buttons (current physical state) ----
    /// Play button.
    pub play: bool,
    /// Record button.
    pub record: bool,
    /// Flux mode button.
    pub flux: bool,
    /// Part select buttons: synth, kick, snare, hi-hat.
    pub drum_select: [bool; 4],
    /// The eight step buttons.
    pub step_buttons: [bool; 8],
    /// Active-step override hold.
    pub active_step_held: bool,
    /// Gate-time hold (modulation / command shift).
    pub gate_time_held: bool,
}

impl Default for ControlFrame {
    fn default() -> Self {
        Self {
            cv_pitch: 0.0,
            gate: 0.0,
            audio_in: 0.0,
            sync_in: None,
            lfo_rate_cv: None,
            octave: 0.0,
            level: 0.8,
            cutoff: 0.7,
            resonance: 0.0,
            lfo_rate: 0.3,
            lfo_intensity: 0.0,
            noise_level: 0.0,
            rhythm_volume: 0.0,
            tempo: 0.5,
            distortion: 0.0,
            delay_time: 0.0,
            delay_amount: 0.0,
            accent_glide: 0.0,
            vco_waveform: VcoWaveform::Square,
            envelope_shape: EnvelopeShape::Attack,
            lfo_mode: LfoMode::OneShot,
            lfo_waveform: LfoWaveform::Square,
            lfo_target: LfoTarget::Vcf,
            ribbon_range: RibbonRange::Key,
            ribbon_position: 0.0,
            ribbon_touching: false,
            play: false,
            record: false,
            flux: false,
            drum_select: [false; 4],
            step_buttons: [false; 8],
            active_step_held: false,
            gate_time_held: false,
        }
    }
}
