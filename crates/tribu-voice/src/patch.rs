//! Patch persistence.
//!
//! [`Patch`] is the serializable snapshot of everything the voice
//! persists: the 16 step slots, the three drum patterns, the selector
//! indices (kit, filter, noise, tempo range) and the sequencer mode
//! flags. It round-trips losslessly through serde; the on-disk format is
//! TOML. File I/O is the only fallible surface in the workspace and the
//! only place `Result` appears.

use crate::controls::TempoRange;
use crate::voice::Voice;
use serde::{Deserialize, Serialize};
use tribu_core::{FilterTopology, NoiseType};
use tribu_drums::DrumKitStyle;
use tribu_seq::Step;

/// Patch load/save errors.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Filesystem error.
    #[error("patch file I/O: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed patch file.
    #[error("patch parse: {0}")]
    Parse(#[from] toml::de::Error),
    /// Serialization failure (should not happen for valid patches).
    #[error("patch encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// One persisted step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPatch {
    /// Skipped flag.
    pub skipped: bool,
    /// Muted flag.
    pub muted: bool,
    /// Pitch in volts-like units.
    pub pitch: f32,
    /// Recorded gate level.
    pub gate: f32,
    /// Gate time fraction.
    pub gate_time: f32,
    /// Accent flag.
    pub accent: bool,
    /// Glide flag.
    pub glide: bool,
}

impl From<Step> for StepPatch {
    fn from(step: Step) -> Self {
        Self {
            skipped: step.skipped,
            muted: step.muted,
            pitch: step.pitch,
            gate: step.gate,
            gate_time: step.gate_time,
            accent: step.accent,
            glide: step.glide,
        }
    }
}

impl From<StepPatch> for Step {
    fn from(patch: StepPatch) -> Self {
        Self {
            skipped: patch.skipped,
            muted: patch.muted,
            pitch: patch.pitch,
            gate: patch.gate,
            gate_time: patch.gate_time,
            accent: patch.accent,
            glide: patch.glide,
        }
    }
}

/// The complete persisted voice state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// All 16 step slots (8-step patches keep their hidden sub-steps).
    pub steps: Vec<StepPatch>,
    /// Kick/snare/hi-hat patterns, 8 slots each.
    pub drum_patterns: [[bool; 8]; 3],
    /// Selected drum kit index.
    pub drum_kit: u8,
    /// Selected filter topology index.
    pub filter_type: u8,
    /// Selected noise color index.
    pub noise_type: u8,
    /// Selected tempo range index.
    pub tempo_range: u8,
    /// Flux recording mode flag.
    pub flux_mode: bool,
    /// 16-step mode flag.
    pub sixteen_step_mode: bool,
    /// External-sync half-tempo divider flag.
    pub sync_half_tempo: bool,
    /// Gate-time modulation lock flag.
    pub gate_times_locked: bool,
    /// Latched LFO sample-and-hold flag.
    pub lfo_sample_hold: bool,
}

impl Default for Patch {
    fn default() -> Self {
        Self::from_voice(&Voice::default())
    }
}

impl Patch {
    /// Snapshot a voice's persisted state.
    pub fn from_voice(voice: &Voice) -> Self {
        let seq = voice.sequencer();
        Self {
            steps: seq.steps().iter().copied().map(StepPatch::from).collect(),
            drum_patterns: core::array::from_fn(|drum| {
                core::array::from_fn(|slot| voice.drum_pattern(drum, slot))
            }),
            drum_kit: voice.drum_kit_style().index(),
            filter_type: voice.filter_topology().index(),
            noise_type: voice.noise_type().index(),
            tempo_range: voice.tempo_range().index(),
            flux_mode: seq.flux_mode(),
            sixteen_step_mode: seq.sixteen_step_mode(),
            sync_half_tempo: voice.sync_half_tempo(),
            gate_times_locked: voice.gate_times_locked(),
            lfo_sample_hold: voice.lfo_sample_hold(),
        }
    }

    /// Write this patch into a voice. Unknown selector indices fall back
    /// to their defaults; extra steps beyond 16 are ignored.
    pub fn apply_to(&self, voice: &mut Voice) {
        // Mode flags first so step writes land against the right layout.
        voice
            .sequencer_mut()
            .set_sixteen_step_mode(self.sixteen_step_mode);
        voice.sequencer_mut().set_flux_mode(self.flux_mode);
        for (i, step) in self.steps.iter().take(16).enumerate() {
            voice.sequencer_mut().set_step(i, Step::from(*step));
        }
        for drum in 0..3 {
            for slot in 0..8 {
                voice.set_drum_pattern(drum, slot, self.drum_patterns[drum][slot]);
            }
        }
        voice.set_drum_kit_style(DrumKitStyle::from_index(self.drum_kit));
        voice.set_filter_topology(FilterTopology::from_index(self.filter_type));
        voice.set_noise_type(NoiseType::from_index(self.noise_type));
        voice.set_tempo_range(TempoRange::from_index(self.tempo_range));
        voice.set_sync_half_tempo(self.sync_half_tempo);
        voice.set_gate_times_locked(self.gate_times_locked);
        voice.set_lfo_sample_hold(self.lfo_sample_hold);
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, PatchError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, PatchError> {
        Ok(toml::from_str(text)?)
    }

    /// Save to a TOML file.
    #[cfg(feature = "std")]
    pub fn save(&self, path: &std::path::Path) -> Result<(), PatchError> {
        #[cfg(feature = "tracing")]
        tracing::info!(path = %path.display(), "saving patch");
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load from a TOML file.
    #[cfg(feature = "std")]
    pub fn load(path: &std::path::Path) -> Result<Self, PatchError> {
        #[cfg(feature = "tracing")]
        tracing::info!(path = %path.display(), "loading patch");
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}
