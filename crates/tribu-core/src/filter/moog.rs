//! Moog-style lowpass, 4-pole with saturation inside every stage.

use super::cutoff_hz;
use crate::fast_math::fast_tanh;

/// Classic Moog ladder discretization: each stage is a saturated one-pole
/// `y = tanh(x·f + tanh(y)·(1 − f))`, with frequency-compensated feedback
/// `res·(1 − 0.15·f²)` from the fourth stage. Heavier tanh usage than
/// [`LadderFilter`](super::LadderFilter) gives it a darker, rounder
/// character at the same settings.
#[derive(Debug, Clone)]
pub struct MoogFilter {
    y1: f32,
    y2: f32,
    y3: f32,
    y4: f32,
    cutoff_param: f32,
    resonance_param: f32,
    inv_sample_rate: f32,
    active: bool,
}

impl Default for MoogFilter {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl MoogFilter {
    /// Create a filter at the given sample rate, cutoff mid-travel.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            y1: 0.0,
            y2: 0.0,
            y3: 0.0,
            y4: 0.0,
            cutoff_param: 0.5,
            resonance_param: 0.0,
            inv_sample_rate: 1.0 / 44100.0,
            active: true,
        };
        filter.set_sample_rate(sample_rate);
        filter
    }

    /// Update the sample rate. Rates below 8 kHz are clamped up.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sample_rate = 1.0 / sample_rate.max(8000.0);
    }

    /// Set normalized cutoff in [0, 1].
    pub fn set_cutoff(&mut self, param: f32) {
        self.cutoff_param = param.clamp(0.0, 1.0);
    }

    /// Set normalized resonance in [0, 1]; maps to feedback gain 0–4.
    pub fn set_resonance(&mut self, param: f32) {
        self.resonance_param = param.clamp(0.0, 1.0);
    }

    /// Enable or disable; disabling clears the state.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.reset();
        }
    }

    /// Clear all stage state.
    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.y3 = 0.0;
        self.y4 = 0.0;
    }

    /// Process one sample. Inactive filters output silence.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.active {
            return 0.0;
        }
        let cutoff = cutoff_hz(self.cutoff_param);
        let res = self.resonance_param * 4.0;
        let f = (cutoff * self.inv_sample_rate * 1.16).min(1.0);
        let fb = res * (1.0 - 0.15 * f * f);

        let x = fast_tanh(input - fb * self.y4);
        self.y1 = fast_tanh(x * f + fast_tanh(self.y1) * (1.0 - f));
        self.y2 = fast_tanh(self.y1 * f + fast_tanh(self.y2) * (1.0 - f));
        self.y3 = fast_tanh(self.y2 * f + fast_tanh(self.y3) * (1.0 - f));
        self.y4 = fast_tanh(self.y3 * f + fast_tanh(self.y4) * (1.0 - f));
        self.y4
    }
}
