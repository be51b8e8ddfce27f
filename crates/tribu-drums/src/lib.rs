//! Tribu Drums - one-shot drum synthesis for the rhythm section
//!
//! Three kits (original, TR-808-style, Latin percussion), each with a
//! kick, snare and hi-hat generator. Every voice is a pure function of
//! elapsed time since its trigger plus a shared noise source: `trigger`
//! re-arms the internal envelopes and phases, `process` returns one
//! sample and self-silences once the amplitude envelope decays below
//! audibility — there is no separate stop call.
//!
//! # Shared noise
//!
//! All voices draw from one [`NoiseGenerator`](tribu_core::NoiseGenerator)
//! passed by reference into `process`. Simultaneously-triggered voices
//! therefore see correlated noise — an intentional trade-off that matches
//! the single noise source of the modeled hardware. Do not "fix" this by
//! giving each voice its own generator; the correlation is part of the
//! sound.
//!
//! [`DrumKit`] owns all nine voices inline and dispatches on
//! [`DrumKitStyle`], a closed enum — the kit set is known at compile time
//! so there is no dynamic dispatch on the audio path.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod kit;
pub mod latin;
pub mod original;
pub mod tr808;

pub use kit::{DrumKit, DrumKitStyle};
