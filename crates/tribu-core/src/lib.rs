//! Tribu Core - DSP primitives for the tribu analog-modeling voice
//!
//! This crate provides the building blocks of the voice: oscillator,
//! resonant filter bank, envelope, LFO, noise, and the small utilities
//! they share. Everything here is designed for a per-sample real-time
//! callback: no allocation, no locking, no panics on the audio path.
//!
//! # Components
//!
//! ## Signal generators
//!
//! - [`Vco`] - Band-limited oscillator (saw / triangle / square)
//! - [`Lfo`] - Modulation oscillator with one-shot, slow and fast modes
//! - [`NoiseGenerator`] - Deterministic white/pink noise source
//!
//! ## Filters
//!
//! - [`Ms20Filter`] - Sallen-Key-style 2-pole with self-oscillation
//! - [`Ms20PreviousFilter`] - Legacy variant kept for A/B compatibility
//! - [`LadderFilter`] / [`MoogFilter`] - 4-stage transistor-ladder models
//! - [`FilterBank`] - Topology selection plus asymmetric parameter smoothing
//! - [`DcBlocker`] - One-pole DC-blocking high-pass
//!
//! ## Control
//!
//! - [`Envelope`] - Linear ADSR state machine with gate-bypass shape
//! - [`GateTrigger`] / [`PulseGen`] - Edge detection and pulse generation
//!
//! # Error handling
//!
//! No `Result` anywhere on the audio path. Out-of-range parameters are
//! clamped, non-finite state triggers a local reset, and index overruns
//! are bounds-checked no-ops. See the crate-level docs of each module.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tribu-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod dc_blocker;
pub mod envelope;
pub mod fast_math;
pub mod filter;
pub mod lfo;
pub mod noise;
pub mod oscillator;
pub mod trigger;

// Re-export main types at crate root
pub use dc_blocker::DcBlocker;
pub use envelope::{Envelope, EnvelopeShape, EnvelopeStage};
pub use fast_math::{fast_sin, fast_tanh, flush_denormal, lerp};
pub use filter::{
    FilterBank, FilterTopology, LadderFilter, MoogFilter, Ms20Filter, Ms20PreviousFilter,
};
pub use lfo::{Lfo, LfoMode, LfoWaveform};
pub use noise::{NoiseGenerator, NoiseType};
pub use oscillator::{Vco, VcoWaveform};
pub use trigger::{GateTrigger, PulseGen};
