//! Parameter table listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::parse_mode;
use clap::Args;
use drumforge_core::{ParamDescriptor, ParamKind};
use drumforge_effects::{MODE_DEPENDENT, Param};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show defaults for this drum mode's filter corners
    #[arg(short, long)]
    mode: Option<String>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let mode = args.mode.as_deref().map(parse_mode).transpose()?;
    let default_for = |p: Param| {
        mode.and_then(|m| m.defaults().get(p))
            .unwrap_or(p.descriptor().default)
    };

    if args.json {
        let entries: Vec<serde_json::Value> = Param::ALL
            .iter()
            .map(|&p| {
                let desc = p.descriptor();
                serde_json::json!({
                    "id": desc.id.0,
                    "string_id": desc.string_id,
                    "name": desc.name,
                    "min": desc.min,
                    "max": desc.max,
                    "default": default_for(p),
                    "unit": desc.unit.suffix().trim(),
                    "labels": desc.labels,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if let Some(mode) = mode {
        println!("Parameters ({} defaults)", mode.label());
    } else {
        println!("Parameters");
    }
    println!();
    println!(
        "  {:>4}  {:14}  {:18}  {:>10}  {}",
        "ID", "Key", "Name", "Default", "Range"
    );
    println!(
        "  {:>4}  {:14}  {:18}  {:>10}  {}",
        "--", "---", "----", "-------", "-----"
    );
    for param in Param::ALL {
        let desc = param.descriptor();
        let marker = if MODE_DEPENDENT.contains(&param) { "*" } else { "" };
        println!(
            "  {:>4}  {:14}  {:18}  {:>10}  {}{}",
            desc.id.0,
            desc.string_id,
            desc.name,
            format_value(desc, default_for(param)),
            format_range(desc),
            marker
        );
    }
    println!();
    println!("  * default follows the drum mode");
    Ok(())
}

fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    match desc.label(value) {
        Some(label) => label.to_string(),
        None => format!("{}{}", trim_float(value), desc.unit.suffix()),
    }
}

fn format_range(desc: &ParamDescriptor) -> String {
    match desc.kind {
        ParamKind::Choice => desc.labels.join(" | "),
        ParamKind::Toggle => "Off | On".to_string(),
        ParamKind::Continuous => format!(
            "{} to {}{}",
            trim_float(desc.min),
            trim_float(desc.max),
            desc.unit.suffix()
        ),
    }
}

fn trim_float(value: f32) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
