//! drumforge CLI - offline drum shaping and preset tools.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drumforge")]
#[command(author, version, about = "Drum transient, dynamics, and tone shaper", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the drum chain
    Render(commands::render::RenderArgs),

    /// List parameters, ranges, and defaults
    Params(commands::params::ParamsArgs),

    /// List, show, and save presets
    Preset(commands::preset::PresetArgs),

    /// Save and inspect state blobs
    State(commands::state::StateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Preset(args) => commands::preset::run(args),
        Commands::State(args) => commands::state::run(args),
    }
}
