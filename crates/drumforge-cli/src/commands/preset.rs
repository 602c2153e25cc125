//! Preset management commands.

use super::common::{ParamSource, display_name, load_preset};
use clap::{Args, Subcommand};
use drumforge_config::{
    Preset, ensure_user_presets_dir, factory_presets, is_factory_preset, list_user_presets,
    user_presets_dir,
};
use drumforge_effects::Param;
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetArgs {
    #[command(subcommand)]
    command: PresetCommand,
}

#[derive(Subcommand)]
enum PresetCommand {
    /// List factory and user presets
    List,

    /// Show the values a preset resolves to
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save a preset built from a mode, another preset, and overrides
    Save {
        /// Name for the new preset
        name: String,

        #[command(flatten)]
        source: ParamSource,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Write here instead of the user presets directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },

    /// Show the user presets directory
    Path,
}

pub fn run(args: PresetArgs) -> anyhow::Result<()> {
    match args.command {
        PresetCommand::List => list(),
        PresetCommand::Show { name } => show(&name),
        PresetCommand::Save {
            name,
            source,
            description,
            output,
            force,
        } => save(&name, &source, description, output, force),
        PresetCommand::Path => {
            println!("{}", user_presets_dir().display());
            Ok(())
        }
    }
}

fn list() -> anyhow::Result<()> {
    println!("Factory presets:");
    for preset in factory_presets() {
        println!(
            "  {:14} {:6} {}",
            preset.name,
            preset.mode,
            preset.description.as_deref().unwrap_or("")
        );
    }

    let user = list_user_presets();
    println!();
    if user.is_empty() {
        println!("No user presets in {}", user_presets_dir().display());
        return Ok(());
    }
    println!("User presets:");
    for path in user {
        match Preset::load(&path) {
            Ok(preset) => println!("  {:14} {:6} {}", display_name(&path), preset.mode, preset.name),
            Err(e) => println!("  {:14} (unreadable: {})", display_name(&path), e),
        }
    }
    Ok(())
}

fn show(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    let snapshot = preset.to_snapshot()?;

    println!("{}", preset.name);
    println!("{}", "=".repeat(preset.name.len()));
    if let Some(description) = &preset.description {
        println!("{description}");
    }
    println!();
    for param in Param::ALL {
        let desc = param.descriptor();
        let value = snapshot.value(param);
        let shown = desc
            .label(value)
            .map_or_else(|| format!("{value}{}", desc.unit.suffix()), str::to_string);
        let marker = if preset.params.contains_key(param.string_id()) {
            "*"
        } else {
            ""
        };
        println!("  {:14} {}{}", param.string_id(), shown, marker);
    }
    println!();
    println!("  * set by the preset");
    Ok(())
}

fn save(
    name: &str,
    source: &ParamSource,
    description: Option<String>,
    output: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    if output.is_none() && is_factory_preset(name) {
        anyhow::bail!("'{}' is a factory preset name; choose another", name);
    }

    let path = match output {
        Some(path) => path,
        None => ensure_user_presets_dir()?.join(format!("{name}.toml")),
    };
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let store = source.build_store()?;
    let mut preset = Preset::from_store(name, &store);
    preset.description = description;
    preset.save(&path)?;

    tracing::info!(path = %path.display(), params = preset.params.len(), "saved preset");
    println!("Saved {}", path.display());
    Ok(())
}
