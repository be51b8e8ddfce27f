//! Offline render command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tribu_voice::{
    ControlFrame, DrumKitStyle, FilterTopology, Patch, Step, TempoRange, VcoWaveform, Voice,
};

/// Filter topology choices for the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliFilter {
    #[default]
    Ms20,
    Ms20Previous,
    Ladder,
    Moog,
}

impl From<CliFilter> for FilterTopology {
    fn from(f: CliFilter) -> Self {
        match f {
            CliFilter::Ms20 => FilterTopology::Ms20,
            CliFilter::Ms20Previous => FilterTopology::Ms20Previous,
            CliFilter::Ladder => FilterTopology::Ladder,
            CliFilter::Moog => FilterTopology::Moog,
        }
    }
}

/// Drum kit choices for the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliKit {
    #[default]
    Original,
    Tr808,
    Latin,
}

impl From<CliKit> for DrumKitStyle {
    fn from(k: CliKit) -> Self {
        match k {
            CliKit::Original => DrumKitStyle::Original,
            CliKit::Tr808 => DrumKitStyle::Tr808,
            CliKit::Latin => DrumKitStyle::Latin,
        }
    }
}

/// Oscillator waveform choices for the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliWaveform {
    #[default]
    Square,
    Triangle,
    Saw,
}

impl From<CliWaveform> for VcoWaveform {
    fn from(w: CliWaveform) -> Self {
        match w {
            CliWaveform::Square => VcoWaveform::Square,
            CliWaveform::Triangle => VcoWaveform::Triangle,
            CliWaveform::Saw => VcoWaveform::Sawtooth,
        }
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Patch file to load (defaults to a built-in demo pattern)
    #[arg(long)]
    patch: Option<PathBuf>,

    /// Render length in seconds
    #[arg(long, default_value = "8.0")]
    seconds: f32,

    /// Sample rate
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Tempo in BPM
    #[arg(long, default_value = "120.0")]
    bpm: f32,

    /// Oscillator waveform
    #[arg(long, value_enum, default_value_t = CliWaveform::Saw)]
    waveform: CliWaveform,

    /// Filter topology
    #[arg(long, value_enum, default_value_t = CliFilter::Ms20)]
    filter: CliFilter,

    /// Drum kit
    #[arg(long, value_enum, default_value_t = CliKit::Original)]
    kit: CliKit,

    /// Filter cutoff (0-1)
    #[arg(long, default_value = "0.7")]
    cutoff: f32,

    /// Filter resonance (0-1)
    #[arg(long, default_value = "0.3")]
    resonance: f32,

    /// Drum section volume (0-1)
    #[arg(long, default_value = "0.7")]
    rhythm: f32,

    /// Distortion amount (0-1)
    #[arg(long, default_value = "0.0")]
    distortion: f32,

    /// Delay amount (0-1)
    #[arg(long, default_value = "0.0")]
    delay: f32,
}

/// Seed the voice with a small built-in pattern when no patch is given.
fn demo_pattern(voice: &mut Voice) {
    // A minor-ish bass line with one glide step.
    let pitches = [0.0, 0.0, 3.0 / 12.0, 0.0, 7.0 / 12.0, 0.0, 10.0 / 12.0, 12.0 / 12.0];
    let seq = voice.sequencer_mut();
    for (i, pitch) in pitches.iter().enumerate() {
        seq.set_step(
            i,
            Step {
                pitch: *pitch - 1.0,
                gate: 5.0,
                gate_time: 0.6,
                glide: i == 7,
                ..Step::default()
            },
        );
    }
    for slot in 0..8 {
        voice.set_drum_pattern(0, slot, slot % 4 == 0);
        voice.set_drum_pattern(1, slot, slot % 8 == 4);
        voice.set_drum_pattern(2, slot, slot % 2 == 1);
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let sample_rate = args.sample_rate.max(8000);
    let mut voice = Voice::new(sample_rate as f32);

    match &args.patch {
        Some(path) => {
            let patch = Patch::load(path)
                .with_context(|| format!("loading patch {}", path.display()))?;
            patch.apply_to(&mut voice);
            info!(patch = %path.display(), "patch loaded");
        }
        None => {
            demo_pattern(&mut voice);
            info!("no patch given, using the built-in demo pattern");
        }
    }

    voice.set_filter_topology(args.filter.into());
    voice.set_drum_kit_style(args.kit.into());
    voice.set_tempo_range(TempoRange::Full);

    let (min_bpm, max_bpm) = TempoRange::Full.bounds();
    let tempo_knob = ((args.bpm - min_bpm) / (max_bpm - min_bpm)).clamp(0.0, 1.0);

    let mut frame = ControlFrame {
        tempo: tempo_knob,
        cutoff: args.cutoff,
        resonance: args.resonance,
        rhythm_volume: args.rhythm,
        distortion: args.distortion,
        delay_amount: args.delay,
        delay_time: 0.4,
        accent_glide: 0.15,
        vco_waveform: args.waveform.into(),
        ..ControlFrame::default()
    };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&args.output, spec)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let sample_time = 1.0 / sample_rate as f32;
    let total = (args.seconds.max(0.1) * sample_rate as f32) as usize;

    // Press play on the first sample, release on the second.
    frame.play = true;
    let samples_written = {
        let mut count = 0usize;
        for i in 0..total {
            if i == 1 {
                frame.play = false;
            }
            let out = voice.process(sample_time, &frame);
            // Outputs are ±10 V; normalize to ±1 for the file.
            writer.write_sample(out.audio * 0.1)?;
            count += 1;
        }
        count
    };
    writer.finalize()?;

    info!(
        output = %args.output.display(),
        seconds = args.seconds,
        samples = samples_written,
        "render complete"
    );
    Ok(())
}
