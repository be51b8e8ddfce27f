//! Tribu CLI - offline renderer and patch tool for the tribu voice.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tribu")]
#[command(author, version, about = "Tribu voice offline renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a pattern to a WAV file
    Render(commands::render::RenderArgs),

    /// Create or inspect patch files
    Patch(commands::patch::PatchArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Patch(args) => commands::patch::run(args),
    }
}
