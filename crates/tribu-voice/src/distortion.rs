//! Output distortion stage.

use tribu_core::fast_math::fast_tanh;

/// Multi-stage waveshaping distortion.
///
/// Drive (up to 51×) into a double-tanh fold, asymmetric threshold
/// clipping at ±0.4, then a one-pole tone filter whose cutoff falls as
/// the amount rises, with the removed high band folded back in through
/// its own saturation. A final gain-compensation term keeps the
/// perceived level roughly flat across the knob. Zero amount is a true
/// bypass.
#[derive(Debug, Clone, Default)]
pub struct Distortion {
    lowpass: f32,
}

impl Distortion {
    const DRIVE_SCALE: f32 = 50.0;
    const THRESHOLD: f32 = 0.4;
    const POSITIVE_CLIP_RATIO: f32 = 0.03;
    const NEGATIVE_CLIP_RATIO: f32 = 0.05;
    const FILTER_BASE: f32 = 0.8;
    const FILTER_SCALE: f32 = 0.3;
    const HIGH_SATURATION: f32 = 8.0;
    const HIGH_MIX: f32 = 0.3;
    const FINAL_SATURATION: f32 = 4.0;
    const FINAL_GAIN: f32 = 0.4;
    const COMPRESSION_BASE: f32 = 0.8;
    const COMPRESSION_SCALE: f32 = 0.1;

    /// Create a distortion stage with cleared tone-filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the tone filter state.
    pub fn reset(&mut self) {
        self.lowpass = 0.0;
    }

    /// Process one sample with the given amount in [0, 1]. Amount ≤ 0
    /// bypasses entirely.
    pub fn process(&mut self, input: f32, amount: f32) -> f32 {
        if amount <= 0.0 {
            return input;
        }

        let mut driven = input * (1.0 + amount * Self::DRIVE_SCALE);
        driven = fast_tanh(driven * 1.5) * 0.7;

        if driven > Self::THRESHOLD {
            driven = Self::THRESHOLD + (driven - Self::THRESHOLD) * Self::POSITIVE_CLIP_RATIO;
        } else if driven < -Self::THRESHOLD {
            driven = -Self::THRESHOLD + (driven + Self::THRESHOLD) * Self::NEGATIVE_CLIP_RATIO;
        }

        driven = fast_tanh(fast_tanh(driven * 2.5) * 0.6 * 3.0) * 0.5;

        let filter_cutoff = Self::FILTER_BASE - amount * Self::FILTER_SCALE;
        self.lowpass += (driven - self.lowpass) * filter_cutoff;

        let high_freq = driven - self.lowpass;
        let output =
            self.lowpass + fast_tanh(high_freq * Self::HIGH_SATURATION) * Self::HIGH_MIX * amount;

        let output = fast_tanh(output * Self::FINAL_SATURATION) * Self::FINAL_GAIN;
        output * (Self::COMPRESSION_BASE / (1.0 + amount * Self::COMPRESSION_SCALE))
    }
}
