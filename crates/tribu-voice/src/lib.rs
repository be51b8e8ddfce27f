//! Tribu Voice - the complete monophonic analog-modeling voice
//!
//! This crate wires the DSP primitives ([`tribu-core`](tribu_core)), the
//! drum section ([`tribu-drums`](tribu_drums)) and the sequencer/ribbon
//! ([`tribu-seq`](tribu_seq)) into one [`Voice`] processed once per
//! audio sample:
//!
//! ```rust
//! use tribu_voice::{ControlFrame, Voice};
//!
//! let mut voice = Voice::new(48000.0);
//! let mut frame = ControlFrame::default();
//! frame.gate = 5.0;
//!
//! let out = voice.process(1.0 / 48000.0, &frame);
//! assert!(out.audio.is_finite());
//! ```
//!
//! The host owns parameter registration, widgets and persistence glue;
//! this crate exposes the numeric controls ([`ControlFrame`]), the
//! voltage-like outputs ([`VoiceFrame`]) and a lossless serde snapshot
//! of everything worth saving ([`Patch`]).

pub mod active_step;
pub mod controls;
pub mod delay;
pub mod distortion;
pub mod param_cache;
pub mod patch;
pub mod voice;

pub use active_step::ActiveStepOverride;
pub use controls::{ControlFrame, DrumPart, LfoTarget, TempoRange};
pub use delay::Delay;
pub use distortion::Distortion;
pub use param_cache::ParameterCache;
pub use patch::{Patch, PatchError, StepPatch};
pub use voice::{Voice, VoiceFrame};

// Re-export the subsystem types hosts need to drive the controls.
pub use tribu_core::{
    EnvelopeShape, FilterTopology, LfoMode, LfoWaveform, NoiseType, VcoWaveform,
};
pub use tribu_drums::DrumKitStyle;
pub use tribu_seq::{RibbonRange, Sequencer, SequencerOutput, Step};
