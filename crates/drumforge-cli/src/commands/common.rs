//! Shared CLI helpers used across multiple commands.

use clap::Args;
use drumforge_config::{
    ParamStore, Preset, find_preset, get_factory_preset, load_state, preset_name_from_path,
};
use drumforge_core::ParamKind;
use drumforge_effects::{DrumMode, Param};
use std::path::PathBuf;

/// Options that build up a parameter store, applied in declaration order.
#[derive(Args, Debug, Default)]
pub struct ParamSource {
    /// Factory preset name, user preset name, or path to a preset file
    #[arg(short, long)]
    pub preset: Option<String>,

    /// State blob written by `drumforge state save`
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Switch drum mode (moves untouched filter corners to the mode defaults)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Parameter override by string id (e.g. "satDrive=12", "satType=Diode")
    #[arg(long = "param", value_parser = parse_key_val, number_of_values = 1)]
    pub params: Vec<(String, String)>,
}

impl ParamSource {
    /// Builds a store: defaults, then preset, state, mode, and overrides.
    pub fn build_store(&self) -> anyhow::Result<ParamStore> {
        let store = ParamStore::new();

        if let Some(name) = &self.preset {
            let preset = load_preset(name)?;
            preset.apply(&store)?;
            tracing::info!(preset = preset.name.as_str(), "loaded preset");
        }

        if let Some(path) = &self.state {
            let bytes = std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
            load_state(&store, &bytes)?;
            tracing::info!(path = %path.display(), "restored state");
        }

        if let Some(label) = &self.mode {
            store.set_mode(parse_mode(label)?);
        }

        for (key, value) in &self.params {
            let param = parse_param(key)?;
            let stored = store.set(param, parse_value(param, value)?);
            tracing::debug!(param = param.string_id(), value = stored, "override");
        }

        Ok(store)
    }
}

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

/// Drum mode by label, case-insensitive.
pub fn parse_mode(label: &str) -> anyhow::Result<DrumMode> {
    DrumMode::from_label(label).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown drum mode '{}'. Expected one of: {}",
            label,
            DrumMode::LABELS.join(", ")
        )
    })
}

/// Parameter by string id; exact match first, then case-insensitive.
pub fn parse_param(key: &str) -> anyhow::Result<Param> {
    Param::from_string_id(key)
        .or_else(|| {
            Param::ALL
                .iter()
                .copied()
                .find(|p| p.string_id().eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown parameter '{}'. Use 'drumforge params' to list them.",
                key
            )
        })
}

/// Plain value for `param`: a number, a choice label, or on/off for toggles.
pub fn parse_value(param: Param, text: &str) -> anyhow::Result<f32> {
    if let Ok(value) = text.parse::<f32>() {
        return Ok(value);
    }
    let desc = param.descriptor();
    match desc.kind {
        ParamKind::Choice => desc
            .label_index(text)
            .map(|i| i as f32)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid value '{}' for {}. Expected a number or one of: {}",
                    text,
                    param.string_id(),
                    desc.labels.join(", ")
                )
            }),
        ParamKind::Toggle => match text.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => Ok(1.0),
            "off" | "false" | "no" => Ok(0.0),
            _ => anyhow::bail!("Invalid value '{}' for {} (expected on/off)", text, param.string_id()),
        },
        ParamKind::Continuous => {
            anyhow::bail!("Invalid value '{}' for {} (expected a number)", text, param.string_id())
        }
    }
}

/// Load a preset by name or path.
///
/// Searches in this order:
/// 1. Factory presets (by name)
/// 2. User presets directory, or a direct file path
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    if let Some(path) = find_preset(name) {
        return Ok(Preset::load(&path)?);
    }

    anyhow::bail!(
        "Preset '{}' not found. Use 'drumforge preset list' to see available presets.",
        name
    )
}

/// Display name for a preset file.
pub fn display_name(path: &std::path::Path) -> String {
    preset_name_from_path(path).unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_once() {
        assert_eq!(
            parse_key_val("satDrive = 12").unwrap(),
            ("satDrive".to_string(), "12".to_string())
        );
        assert!(parse_key_val("nodelimiter").is_err());
    }

    #[test]
    fn values_accept_labels() {
        assert_eq!(parse_value(Param::SatType, "diode").unwrap(), 1.0);
        assert_eq!(parse_value(Param::Oversampling, "4x").unwrap(), 2.0);
        assert_eq!(parse_value(Param::AutoGain, "off").unwrap(), 0.0);
        assert_eq!(parse_value(Param::CompRatio, "3.5").unwrap(), 3.5);
        assert!(parse_value(Param::CompRatio, "lots").is_err());
        assert!(parse_value(Param::SatType, "fuzz").is_err());
    }

    #[test]
    fn params_match_loosely() {
        assert_eq!(parse_param("compRatio").unwrap(), Param::CompRatio);
        assert_eq!(parse_param("COMPRATIO").unwrap(), Param::CompRatio);
        assert!(parse_param("wobble").is_err());
    }

    #[test]
    fn store_layers_apply_in_order() {
        let source = ParamSource {
            preset: Some("kick_punch".to_string()),
            mode: Some("snare".to_string()),
            params: vec![("compRatio".to_string(), "9".to_string())],
            ..ParamSource::default()
        };
        let snap = source.build_store().unwrap().snapshot();
        assert_eq!(snap.mode, DrumMode::Snare);
        assert_eq!(snap.comp_ratio, 9.0);
        // Kick corners were untouched, so the mode switch moved them
        assert_eq!(snap.hpf_hz, 70.0);
        // Preset values without mode defaults survive
        assert_eq!(snap.attack_amount_db, 6.0);
    }
}
