//! Patch file tooling.

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tribu_voice::Patch;

#[derive(Args)]
pub struct PatchArgs {
    #[command(subcommand)]
    command: PatchCommand,
}

#[derive(Subcommand)]
enum PatchCommand {
    /// Write a template patch with the default pattern
    Init {
        /// Output patch file (TOML)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Validate a patch file and print a summary
    Show {
        /// Patch file to inspect
        #[arg(value_name = "PATCH")]
        path: PathBuf,
    },
}

pub fn run(args: PatchArgs) -> anyhow::Result<()> {
    match args.command {
        PatchCommand::Init { output } => {
            let patch = Patch::default();
            patch
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(output = %output.display(), "template patch written");
            Ok(())
        }
        PatchCommand::Show { path } => {
            let patch =
                Patch::load(&path).with_context(|| format!("reading {}", path.display()))?;
            let audible = patch.steps.iter().filter(|s| !s.skipped).count();
            let drum_hits: usize = patch
                .drum_patterns
                .iter()
                .map(|p| p.iter().filter(|&&on| on).count())
                .sum();
            println!("{}", path.display());
            println!(
                "  steps: {} ({} audible), sixteen-step: {}",
                patch.steps.len(),
                audible,
                patch.sixteen_step_mode
            );
            println!("  drum hits: {drum_hits}");
            println!(
                "  kit: {}, filter: {}, noise: {}, tempo range: {}",
                patch.drum_kit, patch.filter_type, patch.noise_type, patch.tempo_range
            );
            println!(
                "  flux: {}, half-tempo sync: {}, gate-times locked: {}",
                patch.flux_mode, patch.sync_half_tempo, patch.gate_times_locked
            );
            Ok(())
        }
    }
}
