//! Ribbon controller mapping.
//!
//! The ribbon is ephemeral per-sample state: raw normalized position and
//! a touching flag come in from the hardware/UI every sample, and all
//! outputs are pure functions of that state plus the range mode and
//! octave bias. Nothing here persists across a touch.

/// Ribbon range modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RibbonRange {
    /// Quantized to 12 chromatic steps over one octave, plus octave bias.
    #[default]
    Key,
    /// ±0.5 octave continuous, plus octave bias.
    Narrow,
    /// ±3 octaves continuous; octave bias is ignored in this mode.
    Wide,
}

impl RibbonRange {
    /// Map a persisted index back to a range mode. Unknown values fall
    /// back to `Key`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Narrow,
            2 => Self::Wide,
            _ => Self::Key,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Key => 0,
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }
}

/// Touch-position to CV/gate/modulation mapping.
#[derive(Debug, Clone, Default)]
pub struct Ribbon {
    position: f32,
    touching: bool,
    range: RibbonRange,
    octave: f32,
}

impl Ribbon {
    /// Create an untouched ribbon in Key mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalized touch position, clamped to [0, 1].
    pub fn set_position(&mut self, position: f32) {
        self.position = if position.is_finite() {
            position.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Current position.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Set whether a finger is on the ribbon.
    pub fn set_touching(&mut self, touching: bool) {
        self.touching = touching;
    }

    /// Whether a finger is on the ribbon.
    pub fn touching(&self) -> bool {
        self.touching
    }

    /// Select the range mode.
    pub fn set_range(&mut self, range: RibbonRange) {
        self.range = range;
    }

    /// Current range mode.
    pub fn range(&self) -> RibbonRange {
        self.range
    }

    /// Set the octave bias in volts (applied in Key and Narrow modes).
    pub fn set_octave(&mut self, octave: f32) {
        self.octave = if octave.is_finite() { octave } else { 0.0 };
    }

    /// Pitch CV in volts-like units for the current touch position.
    pub fn cv(&self) -> f32 {
        match self.range {
            RibbonRange::Key => {
                let step = (self.position * 12.0) as i32;
                step as f32 / 12.0 + self.octave
            }
            RibbonRange::Narrow => self.position - 0.5 + self.octave,
            RibbonRange::Wide => self.position * 6.0 - 3.0,
        }
    }

    /// Gate output: 10 V while touching, 0 V otherwise.
    pub fn gate(&self) -> f32 {
        if self.touching { 10.0 } else { 0.0 }
    }

    /// Gate-time modulation in [0.1, 1.0]; neutral 0.5 when untouched.
    pub fn gate_time_mod(&self) -> f32 {
        if self.touching {
            self.position.clamp(0.1, 1.0)
        } else {
            0.5
        }
    }

    /// Volume automation in [-1, +1]; 0 when untouched.
    pub fn volume_automation(&self) -> f32 {
        if self.touching {
            (self.position - 0.5) * 2.0
        } else {
            0.0
        }
    }

    /// Drum-roll intensity in [0, 1]; 0 when untouched. Drives the roll
    /// retrigger oscillator owned by the orchestrator.
    pub fn drum_roll_intensity(&self) -> f32 {
        if self.touching { self.position } else { 0.0 }
    }
}
