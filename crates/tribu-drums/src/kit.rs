//! Kit selection and voice dispatch.

use crate::{latin, original, tr808};
use tribu_core::noise::NoiseGenerator;

/// The closed set of drum kits. Selection is an enum switch — the kit
/// set is known at compile time, so there is no dynamic dispatch on the
/// audio path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrumKitStyle {
    /// The voice's own kit.
    #[default]
    Original,
    /// TR-808-style kit.
    Tr808,
    /// Latin percussion kit.
    Latin,
}

impl DrumKitStyle {
    /// Map a persisted index back to a kit. Unknown values fall back to
    /// `Original`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Tr808,
            2 => Self::Latin,
            _ => Self::Original,
        }
    }

    /// Stable index for persistence.
    pub fn index(self) -> u8 {
        match self {
            Self::Original => 0,
            Self::Tr808 => 1,
            Self::Latin => 2,
        }
    }
}

/// All nine drum voices held inline, with the selected kit routing
/// triggers and processing.
///
/// Switching kits resets every voice so a ringing tail from the previous
/// kit does not bleed into the new one. The three `process_*` calls each
/// take the shared noise generator; calling them in a fixed order every
/// sample keeps the noise stream advancing consistently regardless of
/// which voices are active.
#[derive(Debug, Clone, Default)]
pub struct DrumKit {
    style: DrumKitStyle,
    kick_original: original::Kick,
    snare_original: original::Snare,
    hihat_original: original::HiHat,
    kick_tr808: tr808::Kick,
    snare_tr808: tr808::Snare,
    hihat_tr808: tr808::HiHat,
    kick_latin: latin::Kick,
    snare_latin: latin::Snare,
    hihat_latin: latin::HiHat,
}

impl DrumKit {
    /// Create a kit with every voice silent, original kit selected.
    pub fn new(sample_rate: f32) -> Self {
        let mut kit = Self::default();
        kit.set_sample_rate(sample_rate);
        kit
    }

    /// Select the active kit, silencing all voices.
    pub fn set_style(&mut self, style: DrumKitStyle) {
        self.style = style;
        self.reset();
    }

    /// Currently selected kit.
    pub fn style(&self) -> DrumKitStyle {
        self.style
    }

    /// Propagate a sample-rate change to every voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.kick_original.set_sample_rate(sample_rate);
        self.snare_original.set_sample_rate(sample_rate);
        self.hihat_original.set_sample_rate(sample_rate);
        self.kick_tr808.set_sample_rate(sample_rate);
        self.snare_tr808.set_sample_rate(sample_rate);
        self.hihat_tr808.set_sample_rate(sample_rate);
        self.kick_latin.set_sample_rate(sample_rate);
        self.snare_latin.set_sample_rate(sample_rate);
        self.hihat_latin.set_sample_rate(sample_rate);
    }

    /// Silence every voice in every kit.
    pub fn reset(&mut self) {
        self.kick_original.reset();
        self.snare_original.reset();
        self.hihat_original.reset();
        self.kick_tr808.reset();
        self.snare_tr808.reset();
        self.hihat_tr808.reset();
        self.kick_latin.reset();
        self.snare_latin.reset();
        self.hihat_latin.reset();
    }

    /// Trigger the selected kit's kick. `accent` in [0, 1].
    pub fn trigger_kick(&mut self, accent: f32) {
        match self.style {
            DrumKitStyle::Original => self.kick_original.trigger(accent),
            DrumKitStyle::Tr808 => self.kick_tr808.trigger(accent),
            DrumKitStyle::Latin => self.kick_latin.trigger(accent),
        }
    }

    /// Trigger the selected kit's snare. `accent` in [0, 1].
    pub fn trigger_snare(&mut self, accent: f32) {
        match self.style {
            DrumKitStyle::Original => self.snare_original.trigger(accent),
            DrumKitStyle::Tr808 => self.snare_tr808.trigger(accent),
            DrumKitStyle::Latin => self.snare_latin.trigger(accent),
        }
    }

    /// Trigger the selected kit's hi-hat. `accent` in [0, 1].
    pub fn trigger_hihat(&mut self, accent: f32) {
        match self.style {
            DrumKitStyle::Original => self.hihat_original.trigger(accent),
            DrumKitStyle::Tr808 => self.hihat_tr808.trigger(accent),
            DrumKitStyle::Latin => self.hihat_latin.trigger(accent),
        }
    }

    /// One kick sample from the selected kit.
    #[inline]
    pub fn process_kick(&mut self, noise: &mut NoiseGenerator) -> f32 {
        match self.style {
            DrumKitStyle::Original => self.kick_original.process(noise),
            DrumKitStyle::Tr808 => self.kick_tr808.process(noise),
            DrumKitStyle::Latin => self.kick_latin.process(noise),
        }
    }

    /// One snare sample from the selected kit.
    #[inline]
    pub fn process_snare(&mut self, noise: &mut NoiseGenerator) -> f32 {
        match self.style {
            DrumKitStyle::Original => self.snare_original.process(noise),
            DrumKitStyle::Tr808 => self.snare_tr808.process(noise),
            DrumKitStyle::Latin => self.snare_latin.process(noise),
        }
    }

    /// One hi-hat sample from the selected kit.
    #[inline]
    pub fn process_hihat(&mut self, noise: &mut NoiseGenerator) -> f32 {
        match self.style {
            DrumKitStyle::Original => self.hihat_original.process(noise),
            DrumKitStyle::Tr808 => self.hihat_tr808.process(noise),
            DrumKitStyle::Latin => self.hihat_latin.process(noise),
        }
    }

    /// Whether any voice of the selected kit is still sounding.
    pub fn any_active(&self) -> bool {
        match self.style {
            DrumKitStyle::Original => {
                self.kick_original.is_active()
                    || self.snare_original.is_active()
                    || self.hihat_original.is_active()
            }
            DrumKitStyle::Tr808 => {
                self.kick_tr808.is_active()
                    || self.snare_tr808.is_active()
                    || self.hihat_tr808.is_active()
            }
            DrumKitStyle::Latin => {
                self.kick_latin.is_active()
                    || self.snare_latin.is_active()
                    || self.hihat_latin.is_active()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_route_to_selected_kit() {
        let mut kit = DrumKit::new(44100.0);
        let mut noise = NoiseGenerator::new();

        kit.set_style(DrumKitStyle::Tr808);
        kit.trigger_kick(0.0);
        assert!(kit.any_active());

        let mut peak = 0.0f32;
        for _ in 0..1000 {
            peak = peak.max(kit.process_kick(&mut noise).abs());
        }
        assert!(peak > 0.1);
    }

    #[test]
    fn kit_switch_silences_ringing_voices() {
        let mut kit = DrumKit::new(44100.0);
        kit.trigger_snare(1.0);
        assert!(kit.any_active());
        kit.set_style(DrumKitStyle::Latin);
        assert!(!kit.any_active());
    }

    #[test]
    fn kits_sound_different() {
        let mut noise = NoiseGenerator::new();
        let mut render = |style: DrumKitStyle| {
            let mut kit = DrumKit::new(44100.0);
            kit.set_style(style);
            kit.trigger_kick(0.0);
            let mut acc = 0.0f32;
            for _ in 0..4000 {
                acc += kit.process_kick(&mut noise).abs();
            }
            acc
        };
        let a = render(DrumKitStyle::Original);
        let b = render(DrumKitStyle::Tr808);
        let c = render(DrumKitStyle::Latin);
        assert!((a - b).abs() > 1.0 || (b - c).abs() > 1.0);
    }

    #[test]
    fn style_index_roundtrip() {
        for style in [
            DrumKitStyle::Original,
            DrumKitStyle::Tr808,
            DrumKitStyle::Latin,
        ] {
            assert_eq!(DrumKitStyle::from_index(style.index()), style);
        }
        assert_eq!(DrumKitStyle::from_index(9), DrumKitStyle::Original);
    }
}
