//! Band-limited voltage-controlled oscillator.
//!
//! Three waveforms, each with its own anti-aliasing strategy:
//!
//! - **Sawtooth**: naive ramp with a PolyBLEP correction at the phase
//!   wrap. The polynomial residual suppresses the step discontinuity's
//!   aliases without dulling the top octave.
//! - **Triangle**: no hard discontinuity, so no BLEP; a cubic
//!   soft-shaping term (`x + 0.05·x³`) thickens the harmonics the way
//!   the analog core's asymmetry does.
//! - **Square**: naive bipolar with linear-ramp edges over a small phase
//!   window, trading a touch of edge softness for alias suppression.
//!
//! Pitch is volts-per-octave around middle C: `freq = C4 · 2^pitch`.
//!
//! Reference: Välimäki et al., "Antialiasing Oscillators in Subtractive
//! Synthesis", IEEE Signal Processing Magazine, 2010.

/// Middle C in Hz, the 0 V reference of the pitch input.
pub const FREQ_C4: f32 = 261.6256;

/// Oscillator waveform selection, in panel-switch order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VcoWaveform {
    /// Ramp-edged square.
    #[default]
    Square,
    /// Cubic-shaped triangle.
    Triangle,
    /// PolyBLEP sawtooth.
    Sawtooth,
}

impl VcoWaveform {
    /// Map a persisted index back to a waveform. Unknown values fall back
    /// to `Square`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Triangle,
            2 => Self::Sawtooth,
            _ => Self::Square,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Square => 0,
            Self::Triangle => 1,
            Self::Sawtooth => 2,
        }
    }
}

/// The voice's single oscillator.
///
/// Holds only a phase accumulator and the previous saw/pulse samples;
/// all waveform generation is stateless past the phase. When the pitch
/// maps to a non-finite or near-zero frequency the oscillator goes
/// inactive: saw holds its last sample (the downstream filter decays it),
/// triangle and square output silence.
#[derive(Debug, Clone)]
pub struct Vco {
    phase: f32,
    freq: f32,
    waveform: VcoWaveform,
    last_saw: f32,
    active: bool,
    enabled: bool,
}

impl Default for Vco {
    fn default() -> Self {
        Self::new()
    }
}

impl Vco {
    /// Create an oscillator at the 0 V reference pitch.
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            freq: FREQ_C4,
            waveform: VcoWaveform::Square,
            last_saw: 0.0,
            active: true,
            enabled: true,
        }
    }

    /// Set pitch in volts (1 V/octave around middle C).
    ///
    /// Non-finite pitch is guarded to 0 Hz, the result is clamped to
    /// [0.1, 48000] Hz, and frequencies at or below 1 Hz deactivate the
    /// oscillator.
    pub fn set_pitch(&mut self, pitch: f32) {
        let freq = if pitch.is_finite() {
            FREQ_C4 * libm::exp2f(pitch)
        } else {
            0.0
        };
        let freq = if freq.is_finite() { freq } else { 0.0 };
        self.freq = freq.clamp(0.1, 48000.0);
        self.active = self.freq > 1.0;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Select the waveform.
    pub fn set_waveform(&mut self, waveform: VcoWaveform) {
        self.waveform = waveform;
    }

    /// External enable; a disabled oscillator behaves like an inactive
    /// one regardless of pitch.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether pitch and enable currently allow output.
    pub fn is_active(&self) -> bool {
        self.active && self.enabled
    }

    /// Reset the phase accumulator.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last_saw = 0.0;
    }

    /// Generate one sample.
    #[inline]
    pub fn process(&mut self, sample_time: f32) -> f32 {
        if !self.is_active() {
            return match self.waveform {
                VcoWaveform::Sawtooth => self.last_saw,
                _ => 0.0,
            };
        }

        let dt = self.freq * sample_time;
        // An increment past a full cycle cannot be band-limited at all;
        // bail out instead of splattering aliases.
        if dt > 1.0 {
            self.phase = 0.0;
            return match self.waveform {
                VcoWaveform::Sawtooth => self.last_saw,
                _ => 0.0,
            };
        }

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        match self.waveform {
            VcoWaveform::Sawtooth => {
                let naive = 2.0 * self.phase - 1.0;
                let saw = naive - poly_blep(self.phase, dt);
                self.last_saw = saw;
                saw
            }
            VcoWaveform::Triangle => {
                let tri = if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                };
                tri + 0.05 * tri * tri * tri
            }
            VcoWaveform::Square => {
                // Transition half-width in phase units. The rising edge
                // straddles the wrap: -1 → 0 just before, 0 → +1 just
                // after, so the ramp is continuous across the reset.
                const EDGE: f32 = 0.005;
                let p = self.phase;
                if p < EDGE {
                    p / EDGE
                } else if p > 0.5 - EDGE && p < 0.5 + EDGE {
                    // Falling edge: ramp +1 → -1
                    let t = (p - (0.5 - EDGE)) / (2.0 * EDGE);
                    1.0 - 2.0 * t
                } else if p > 1.0 - EDGE {
                    (p - (1.0 - EDGE)) / EDGE - 1.0
                } else if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// 2nd-order PolyBLEP residual for a falling step at the phase wrap.
///
/// Two-sample correction window: the quadratic pieces meet the naive
/// waveform with matched value at the window edges, suppressing the
/// step's aliases by roughly 30 dB.
///
/// # Arguments
/// * `t` - phase in [0.0, 1.0)
/// * `dt` - phase increment per sample
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
