//! The original kit: the voice's own drum character.
//!
//! Balanced between body and noise — a kick with an analog-drift sub
//! layer, a dual-tone snare with a slow buzz tail, and a four-partial
//! metallic hi-hat.

mod hihat;
mod kick;
mod snare;

pub use hihat::HiHat;
pub use kick::Kick;
pub use snare::Snare;
