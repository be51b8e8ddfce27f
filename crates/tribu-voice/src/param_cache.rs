//! Batched control snapshot.

use crate::controls::{ControlFrame, LfoTarget};
use tribu_core::{EnvelopeShape, LfoMode, LfoWaveform, VcoWaveform};
use tribu_seq::RibbonRange;

/// Snapshot of the knob and switch values, refreshed every 64 samples
/// (~1.5 ms at 44.1 kHz).
///
/// Most control-derived work (tempo math, enum decoding, range mapping)
/// does not need sample accuracy; batching it keeps the per-sample path
/// to signal processing only. The cache is not authoritative state —
/// just a copy with an explicit refresh counter. Jack voltages (CV,
/// gate, sync, audio) are *not* cached; those are read every sample.
#[derive(Debug, Clone)]
pub struct ParameterCache {
    /// Filter cutoff, normalized.
    pub cutoff: f32,
    /// Filter resonance, normalized.
    pub resonance: f32,
    /// VCA level.
    pub volume: f32,
    /// LFO rate knob.
    pub lfo_rate: f32,
    /// LFO depth.
    pub lfo_intensity: f32,
    /// Noise mix level.
    pub noise_level: f32,
    /// Drum section volume.
    pub rhythm_volume: f32,
    /// Tempo knob.
    pub tempo: f32,
    /// Octave bias in volts.
    pub octave: f32,
    /// Distortion amount.
    pub distortion: f32,
    /// Delay time.
    pub delay_time: f32,
    /// Delay amount.
    pub delay_amount: f32,
    /// Accent/glide amount.
    pub accent_glide: f32,
    /// Envelope shape selector.
    pub envelope_shape: EnvelopeShape,
    /// LFO mode selector.
    pub lfo_mode: LfoMode,
    /// LFO destination selector.
    pub lfo_target: LfoTarget,
    /// LFO waveform selector.
    pub lfo_waveform: LfoWaveform,
    /// Ribbon range selector.
    pub ribbon_range: RibbonRange,
    /// Oscillator waveform selector.
    pub vco_waveform: VcoWaveform,
    counter: u32,
}

impl Default for ParameterCache {
    fn default() -> Self {
        let mut cache = Self {
            cutoff: 0.7,
            resonance: 0.0,
            volume: 0.8,
            lfo_rate: 0.3,
            lfo_intensity: 0.0,
            noise_level: 0.0,
            rhythm_volume: 0.0,
            tempo: 0.5,
            octave: 0.0,
            distortion: 0.0,
            delay_time: 0.0,
            delay_amount: 0.0,
            accent_glide: 0.0,
            envelope_shape: EnvelopeShape::Attack,
            lfo_mode: LfoMode::OneShot,
            lfo_target: LfoTarget::Vcf,
            lfo_waveform: LfoWaveform::Square,
            ribbon_range: RibbonRange::Key,
            vco_waveform: VcoWaveform::Square,
            counter: 0,
        };
        // First needs_update() call must refresh immediately.
        cache.counter = Self::UPDATE_INTERVAL;
        cache
    }
}

impl ParameterCache {
    /// Refresh cadence in samples.
    pub const UPDATE_INTERVAL: u32 = 64;

    /// Create a cache that refreshes on its first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the refresh counter; true once per interval (and on the
    /// very first call).
    #[inline]
    pub fn needs_update(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= Self::UPDATE_INTERVAL {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Copy the control values out of a frame.
    pub fn refresh(&mut self, frame: &ControlFrame) {
        self.cutoff = frame.cutoff;
        self.resonance = frame.resonance;
        self.volume = frame.level;
        self.lfo_rate = frame.lfo_rate;
        self.lfo_intensity = frame.lfo_intensity;
        self.noise_level = frame.noise_level;
        self.rhythm_volume = frame.rhythm_volume;
        self.tempo = frame.tempo;
        self.octave = frame.octave;
        self.distortion = frame.distortion;
        self.delay_time = frame.delay_time;
        self.delay_amount = frame.delay_amount;
        self.accent_glide = frame.accent_glide;
        self.envelope_shape = frame.envelope_shape;
        self.lfo_mode = frame.lfo_mode;
        self.lfo_target = frame.lfo_target;
        self.lfo_waveform = frame.lfo_waveform;
        self.ribbon_range = frame.ribbon_range;
        self.vco_waveform = frame.vco_waveform;
    }
}
