//! DC blocking filter for removing DC offset from audio signals.
//!
//! First-order highpass after Julius O. Smith's DC blocker:
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R*z^-1)
//! ```
//!
//! The voice places four of these along the output chain (post-VCA,
//! post-filter, post-distortion, final) with progressively lower cutoffs,
//! since the nonlinear stages each reintroduce a small DC component.

use crate::fast_math::TWO_PI;

/// One-pole DC-blocking high-pass with a configurable cutoff.
///
/// Implements `y[n] = x[n] - x[n-1] + R*y[n-1]` with R derived from the
/// cutoff and sample rate. Output state is flushed when it decays into
/// denormal territory.
#[derive(Debug, Clone)]
pub struct DcBlocker {
    sample_rate: f32,
    cutoff: f32,
    coeff: f32,
    x_prev: f32,
    y_prev: f32,
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new(44100.0, 20.0)
    }
}

impl DcBlocker {
    /// Create a blocker for the given sample rate and cutoff in Hz.
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut blocker = Self {
            sample_rate: 44100.0,
            cutoff: 20.0,
            coeff: 0.995,
            x_prev: 0.0,
            y_prev: 0.0,
        };
        blocker.set_sample_rate(sample_rate);
        blocker.set_cutoff(cutoff_hz);
        blocker
    }

    /// Update the sample rate, keeping the configured cutoff. Rates below
    /// 100 Hz are treated as misconfiguration and replaced with 44.1 kHz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = if sample_rate > 100.0 {
            sample_rate
        } else {
            44100.0
        };
        self.update_coeff();
    }

    /// Set the -3 dB cutoff in Hz. Non-positive cutoffs fall back to 20 Hz.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff = if cutoff_hz > 0.1 { cutoff_hz } else { 20.0 };
        self.update_coeff();
    }

    /// Current R coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Process one sample, removing DC.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = x - self.x_prev + self.coeff * self.y_prev;
        self.x_prev = x;
        self.y_prev = if y > -1e-20 && y < 1e-20 { 0.0 } else { y };
        self.y_prev
    }

    /// Clear the filter state.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    fn update_coeff(&mut self) {
        let x = TWO_PI * self.cutoff / self.sample_rate;
        self.coeff = ((1.0 - x) / (1.0 + x)).clamp(0.0, 0.9999);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    #[test]
    fn removes_dc() {
        let mut blocker = DcBlocker::new(48000.0, 20.0);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = blocker.process(1.0);
        }
        assert!(out.abs() < 0.01, "DC should be removed, got {out}");
    }

    #[test]
    fn passes_audio_band() {
        let mut blocker = DcBlocker::new(48000.0, 20.0);
        let freq = 1000.0;
        for i in 0..48000 {
            let t = i as f32 / 48000.0;
            blocker.process(libm::sinf(2.0 * PI * freq * t));
        }
        let mut max_out = 0.0f32;
        for i in 48000..48096 {
            let t = i as f32 / 48000.0;
            let out = blocker.process(libm::sinf(2.0 * PI * freq * t));
            max_out = max_out.max(out.abs());
        }
        assert!(max_out > 0.95, "1 kHz should pass, peak was {max_out}");
    }

    #[test]
    fn lower_cutoff_means_higher_coeff() {
        let low = DcBlocker::new(48000.0, 10.0);
        let high = DcBlocker::new(48000.0, 30.0);
        assert!(low.coeff() > high.coeff());
    }

    #[test]
    fn degenerate_config_falls_back() {
        let blocker = DcBlocker::new(0.0, -5.0);
        assert!(blocker.coeff() > 0.9 && blocker.coeff() < 1.0);
    }

    #[test]
    fn reset_clears_state() {
        let mut blocker = DcBlocker::new(48000.0, 20.0);
        for _ in 0..100 {
            blocker.process(1.0);
        }
        blocker.reset();
        assert_eq!(blocker.process(0.0), 0.0);
    }
}
