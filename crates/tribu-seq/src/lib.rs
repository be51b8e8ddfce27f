//! Tribu Seq - step sequencer and ribbon controller
//!
//! The [`Sequencer`] is the voice's pattern state machine: up to 16
//! steps with skip/mute/accent/glide flags, internal-clock or
//! external-sync advancement, gate-time modulation, live note recording,
//! and continuous "flux" gesture recording into a fixed ring buffer.
//!
//! The [`Ribbon`] maps a normalized touch position to pitch CV, gate and
//! the secondary modulation outputs (gate time, volume automation, drum
//! roll intensity), depending on a three-way range mode.
//!
//! Both types are allocation-free value-type state machines intended to
//! live inside a per-sample audio callback.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod ribbon;
pub mod sequencer;

pub use ribbon::{Ribbon, RibbonRange};
pub use sequencer::{Sequencer, SequencerOutput, Step};
