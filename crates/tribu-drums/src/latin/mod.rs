//! Latin percussion kit.
//!
//! Brighter and shorter than the other kits: a high-tuned timbale-like
//! kick, a crispy snare with an extra crackle layer, and a shaker-style
//! hi-hat.

mod hihat;
mod kick;
mod snare;

pub use hihat::HiHat;
pub use kick::Kick;
pub use snare::Snare;
