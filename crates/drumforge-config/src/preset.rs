//! Preset file format and operations.

use std::collections::BTreeMap;
use std::path::Path;

use drumforge_effects::{DrumMode, Param, ParamSnapshot};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::ParamStore;

/// A named set of parameter values, stored as TOML.
///
/// Parameters are keyed by their stable string id. Anything not listed
/// takes its default, except the mode-dependent corners, which take the
/// preset mode's defaults.
///
/// # TOML Format
///
/// ```toml
/// name = "Kick Punch"
/// description = "Tight low end with a clicky front"
/// mode = "Kick"
///
/// [params]
/// attAmt = 6.0
/// compRatio = 6.0
/// satDrive = 9.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Drum mode label (`Kick`, `Snare`, `Tom`, `Hat`, `Perc`, `Bus`).
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Plain parameter values keyed by string id.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

fn default_mode() -> String {
    DrumMode::default().label().to_string()
}

impl Preset {
    /// Create a new empty preset in the default mode.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            mode: default_mode(),
            params: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the drum mode.
    pub fn with_mode(mut self, mode: DrumMode) -> Self {
        self.mode = mode.label().to_string();
        self
    }

    /// Set one parameter value.
    pub fn with_param(mut self, param: Param, value: f32) -> Self {
        self.params.insert(param.string_id().to_string(), value);
        self
    }

    /// Captures every non-default value of a snapshot.
    ///
    /// Mode-dependent corners are compared against the snapshot mode's
    /// defaults rather than the table defaults.
    pub fn from_snapshot(name: impl Into<String>, snapshot: &ParamSnapshot) -> Self {
        let baseline = Self::baseline(snapshot.mode);
        let mut preset = Self::new(name).with_mode(snapshot.mode);
        for param in Param::ALL {
            if param == Param::Mode {
                continue;
            }
            let value = snapshot.value(param);
            if value != baseline.value(param) {
                preset = preset.with_param(param, value);
            }
        }
        preset
    }

    /// Captures the current contents of a store.
    pub fn from_store(name: impl Into<String>, store: &ParamStore) -> Self {
        Self::from_snapshot(name, &store.snapshot())
    }

    /// Parsed drum mode.
    pub fn drum_mode(&self) -> Result<DrumMode, ConfigError> {
        DrumMode::from_label(&self.mode).ok_or_else(|| ConfigError::UnknownMode(self.mode.clone()))
    }

    /// Resolves the preset into a full snapshot.
    ///
    /// Fails on an unknown mode label or parameter id; values are sanitized.
    pub fn to_snapshot(&self) -> Result<ParamSnapshot, ConfigError> {
        let mode = self.drum_mode()?;
        let mut values = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            let param =
                Param::from_string_id(key).ok_or_else(|| ConfigError::UnknownParam(key.clone()))?;
            if param == Param::Mode {
                continue;
            }
            values.push((param, *value));
        }

        let baseline = Self::baseline(mode);
        Ok(ParamSnapshot::from_lookup(|p| {
            let explicit = values.iter().find(|(param, _)| *param == p).map(|(_, v)| *v);
            Some(explicit.unwrap_or_else(|| baseline.value(p)))
        }))
    }

    /// Writes the preset into `store`. Nothing is written if the preset is
    /// invalid.
    pub fn apply(&self, store: &ParamStore) -> Result<(), ConfigError> {
        let snapshot = self.to_snapshot().inspect_err(|e| {
            tracing::warn!(preset = self.name.as_str(), error = %e, "rejected preset");
        })?;
        store.apply_snapshot(&snapshot);
        tracing::debug!(preset = self.name.as_str(), mode = self.mode.as_str(), "preset applied");
        Ok(())
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "rejected preset file");
        })?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !p.exists())
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Table defaults with the mode's filter corners.
    fn baseline(mode: DrumMode) -> ParamSnapshot {
        let corners = mode.defaults();
        ParamSnapshot {
            mode,
            hpf_hz: corners.hpf_hz,
            sidechain_hpf_hz: corners.sc_hpf_hz,
            body_hz: corners.body_hz,
            ..ParamSnapshot::default()
        }
    }
}
