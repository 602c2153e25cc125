//! State blob utilities.

use super::common::ParamSource;
use clap::{Args, Subcommand};
use drumforge_config::{decode_state, save_state};
use drumforge_effects::Param;
use std::path::PathBuf;

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    command: StateCommand,
}

#[derive(Subcommand)]
enum StateCommand {
    /// Write a state blob
    Save {
        /// Output file
        output: PathBuf,

        #[command(flatten)]
        source: ParamSource,
    },

    /// Decode a state blob and print its values
    Show {
        /// State file
        input: PathBuf,
    },
}

pub fn run(args: StateArgs) -> anyhow::Result<()> {
    match args.command {
        StateCommand::Save { output, source } => {
            let store = source.build_store()?;
            let blob = save_state(&store)?;
            std::fs::write(&output, &blob)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", output.display()))?;
            println!("Wrote {} ({} bytes)", output.display(), blob.len());
        }
        StateCommand::Show { input } => {
            let bytes = std::fs::read(&input)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", input.display()))?;
            let values = decode_state(&bytes)?;
            for (param, value) in Param::ALL.iter().zip(values) {
                println!("{:14} {}", param.string_id(), value);
            }
        }
    }
    Ok(())
}
