//! Opaque state blob for host session save/restore.
//!
//! The blob is JSON keyed by stable numeric parameter id, so it survives
//! reordering of the parameter table:
//!
//! ```json
//! {"version":1,"params":{"100":0.0,"101":1.0,"102":30.0}}
//! ```
//!
//! Values are written as `f64` widened from the stored `f32`, which parses
//! back to the identical `f32`.

use std::collections::BTreeMap;

use drumforge_core::ParamId;
use drumforge_effects::{PARAM_COUNT, Param};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::ParamStore;

/// Current state format version.
pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateBlob {
    version: u32,
    params: BTreeMap<String, f64>,
}

/// Serializes every parameter value in `store`.
pub fn save_state(store: &ParamStore) -> Result<Vec<u8>, ConfigError> {
    let params = Param::ALL
        .iter()
        .map(|&p| (p.id().0.to_string(), f64::from(store.get(p))))
        .collect();
    let blob = StateBlob {
        version: STATE_VERSION,
        params,
    };
    Ok(serde_json::to_vec(&blob)?)
}

/// Parses a blob into plain values in table order, without touching any store.
///
/// Parameters missing from the blob take their defaults. Ids this build does
/// not know are skipped.
pub fn decode_state(bytes: &[u8]) -> Result<[f32; PARAM_COUNT], ConfigError> {
    let blob: StateBlob = serde_json::from_slice(bytes)?;
    if blob.version != STATE_VERSION {
        return Err(ConfigError::UnsupportedVersion(blob.version));
    }

    let mut values = Param::ALL.map(|p| p.descriptor().default);
    for (key, value) in &blob.params {
        let param = key.parse::<u32>().ok().map(ParamId).and_then(Param::from_id);
        match param {
            Some(param) => values[param.index()] = param.descriptor().sanitize(*value as f32),
            None => tracing::debug!(key = key.as_str(), "skipping unknown state entry"),
        }
    }
    Ok(values)
}

/// Replaces every value in `store` with the blob's contents.
///
/// The blob is fully decoded before anything is written; on error the store
/// is left unchanged.
pub fn load_state(store: &ParamStore, bytes: &[u8]) -> Result<(), ConfigError> {
    let values = decode_state(bytes)?;
    for (param, value) in Param::ALL.iter().zip(values) {
        store.set(*param, value);
    }
    Ok(())
}

/// Host-facing restore: invalid data leaves the store untouched.
///
/// Returns whether the state was applied.
pub fn restore_state(store: &ParamStore, bytes: &[u8]) -> bool {
    match load_state(store, bytes) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, len = bytes.len(), "ignoring invalid state blob");
            false
        }
    }
}
