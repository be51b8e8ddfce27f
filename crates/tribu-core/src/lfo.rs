//! Low-frequency oscillator with one-shot, slow and fast modes.
//!
//! The LFO drives pitch and/or cutoff modulation. Its rate knob is
//! reinterpreted per mode: ONE SHOT spans 1–5 Hz and fires a single
//! asymmetric pulse per trigger (self-deactivating at half phase, not a
//! full cycle), SLOW spans 0.05–18 Hz, and FAST reaches 5 kHz where it
//! doubles as an audio-rate modulator. An external rate CV, when
//! connected, bypasses the mode mapping entirely.
//!
//! Gate rising edges retrigger the phase in FAST and ONE SHOT modes only;
//! SLOW runs free so that long sweeps survive note changes.

use crate::noise::NoiseGenerator;

/// LFO rate-mapping modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoMode {
    /// Single pulse per trigger, knob maps to 1–5 Hz.
    #[default]
    OneShot,
    /// Free-running, knob maps to 0.05–18 Hz.
    Slow,
    /// Free-running up to audio rate, knob maps to 1–5000 Hz.
    Fast,
}

impl LfoMode {
    /// Map a persisted index back to a mode. Unknown values fall back to
    /// `OneShot`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Slow,
            2 => Self::Fast,
            _ => Self::OneShot,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::OneShot => 0,
            Self::Slow => 1,
            Self::Fast => 2,
        }
    }
}

/// LFO waveform selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Bipolar square.
    #[default]
    Square,
    /// Linear up/down ramp.
    Triangle,
    /// Rising ramp with abrupt reset.
    Sawtooth,
    /// New uniform random value at every phase wrap.
    SampleHold,
}

impl LfoWaveform {
    /// Map a persisted index back to a waveform. Unknown values fall back
    /// to `Square`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Triangle,
            2 => Self::Sawtooth,
            3 => Self::SampleHold,
            _ => Self::Square,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Square => 0,
            Self::Triangle => 1,
            Self::Sawtooth => 2,
            Self::SampleHold => 3,
        }
    }
}

/// Modulation oscillator. Output is bipolar in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    freq: f32,
    mode: LfoMode,
    /// One-shot armed and currently firing.
    firing: bool,
    active: bool,
    /// Latched sample-and-hold mode: overrides the waveform switch and
    /// disables one-shot behavior while engaged.
    sh_latched: bool,
    sh_value: f32,
    last_phase: f32,
    random: NoiseGenerator,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Lfo {
    /// Absolute frequency floor across all modes, in Hz.
    pub const MIN_FREQ: f32 = 0.01;
    /// Absolute frequency ceiling across all modes, in Hz.
    pub const MAX_FREQ: f32 = 5000.0;

    /// Create an idle LFO in one-shot mode at 1 Hz.
    pub fn new() -> Self {
        let mut random = NoiseGenerator::new();
        random.set_seed(0x4c46_4f21);
        Self {
            phase: 0.0,
            freq: 1.0,
            mode: LfoMode::OneShot,
            firing: false,
            active: true,
            sh_latched: false,
            sh_value: 0.0,
            last_phase: 0.0,
            random,
        }
    }

    /// Select the rate-mapping mode.
    pub fn set_mode(&mut self, mode: LfoMode) {
        if self.mode != mode {
            self.mode = mode;
            if mode != LfoMode::OneShot {
                self.firing = false;
            }
        }
    }

    /// Current mode.
    pub fn mode(&self) -> LfoMode {
        self.mode
    }

    /// Enable or disable the LFO. A disabled LFO outputs zero.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Map the normalized rate knob through the current mode's range.
    pub fn set_rate_knob(&mut self, knob: f32) {
        let knob = knob.clamp(0.0, 1.0);
        let freq = match self.mode {
            LfoMode::OneShot => 1.0 + knob * 4.0,
            LfoMode::Slow => 0.05 + knob * 17.95,
            LfoMode::Fast => 1.0 + knob * 4999.0,
        };
        self.freq = freq.clamp(Self::MIN_FREQ, Self::MAX_FREQ);
    }

    /// Override the rate from an external CV (volts-per-octave around
    /// 1 Hz), bypassing the mode mapping. Non-finite CV is ignored.
    pub fn set_rate_cv(&mut self, cv: f32) {
        if cv.is_finite() {
            self.freq = libm::exp2f(cv).clamp(Self::MIN_FREQ, Self::MAX_FREQ);
        }
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Engage or release the latched sample-and-hold mode. Engaging draws
    /// a fresh held value immediately.
    pub fn set_sample_hold_latched(&mut self, latched: bool) {
        if latched && !self.sh_latched {
            self.sh_value = self.random.white();
        }
        self.sh_latched = latched;
    }

    /// Whether latched sample-and-hold is engaged.
    pub fn sample_hold_latched(&self) -> bool {
        self.sh_latched
    }

    /// React to a gate rising edge. Retriggers the phase in ONE SHOT and
    /// FAST modes; SLOW is unaffected. Latched sample-and-hold suppresses
    /// the one-shot arm so the held-value behavior keeps running.
    pub fn gate_retrigger(&mut self) {
        match self.mode {
            LfoMode::OneShot => {
                if !self.sh_latched {
                    self.phase = 0.0;
                    self.last_phase = 0.0;
                    self.firing = true;
                }
            }
            LfoMode::Fast => {
                self.phase = 0.0;
                self.last_phase = 0.0;
            }
            LfoMode::Slow => {}
        }
    }

    /// Reset phase and one-shot state.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last_phase = 0.0;
        self.firing = false;
    }

    /// Advance one sample and return the modulation value.
    #[inline]
    pub fn process(&mut self, sample_time: f32, waveform: LfoWaveform) -> f32 {
        let one_shot = self.mode == LfoMode::OneShot && !self.sh_latched;
        if !self.active || (one_shot && !self.firing) {
            return 0.0;
        }

        self.phase += self.freq * sample_time;

        // Half-phase self-deactivation: the one-shot emits the first half
        // of the waveform only.
        if one_shot && self.phase >= 0.5 {
            self.firing = false;
            return 0.0;
        }

        if self.phase >= 1.0 {
            self.phase -= 1.0;
            if one_shot {
                self.firing = false;
            }
        }

        let output = if self.sh_latched || waveform == LfoWaveform::SampleHold {
            if self.phase < self.last_phase {
                self.sh_value = self.random.white();
            }
            self.sh_value
        } else {
            match waveform {
                LfoWaveform::Square => {
                    if self.phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                LfoWaveform::Triangle => {
                    if self.phase < 0.5 {
                        4.0 * self.phase - 1.0
                    } else {
                        3.0 - 4.0 * self.phase
                    }
                }
                LfoWaveform::Sawtooth => 2.0 * self.phase - 1.0,
                LfoWaveform::SampleHold => unreachable!(),
            }
        };

        self.last_phase = self.phase;
        output
    }
}
