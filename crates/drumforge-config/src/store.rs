//! Lock-free parameter store shared between control and audio threads.
//!
//! Values are kept as `f32` bit-cast into `AtomicU32`. Writers sanitize
//! before storing, so the audio thread only ever reads in-range values and
//! can build a [`ParamSnapshot`] once per block without locking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use drumforge_effects::{DrumMode, PARAM_COUNT, Param, ParamNudge, ParamSnapshot, mode_nudges};

/// Shared parameter values for one chain instance.
///
/// Cloning is cheap and every clone sees the same values.
///
/// ```rust
/// use drumforge_config::ParamStore;
/// use drumforge_effects::Param;
///
/// let store = ParamStore::new();
/// let audio_side = store.clone();
/// store.set(Param::SatDrive, 14.0);
/// assert_eq!(audio_side.snapshot().sat_drive_db, 14.0);
/// ```
#[derive(Clone)]
pub struct ParamStore {
    values: Arc<[AtomicU32]>,
}

impl ParamStore {
    /// Store holding every parameter at its default.
    pub fn new() -> Self {
        Self {
            values: Param::ALL
                .iter()
                .map(|p| AtomicU32::new(p.descriptor().default.to_bits()))
                .collect(),
        }
    }

    /// Store initialized from a snapshot.
    pub fn from_snapshot(snapshot: &ParamSnapshot) -> Self {
        let store = Self::new();
        store.apply_snapshot(snapshot);
        store
    }

    /// Current plain value (lock-free).
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        self.values
            .get(param.index())
            .map_or(param.descriptor().default, |v| {
                f32::from_bits(v.load(Ordering::Acquire))
            })
    }

    /// Writes a plain value and returns what was stored.
    ///
    /// The value is sanitized first: clamped to range, choices rounded,
    /// non-finite input replaced by the default.
    pub fn set(&self, param: Param, value: f32) -> f32 {
        let stored = param.descriptor().sanitize(value);
        if let Some(atomic) = self.values.get(param.index()) {
            atomic.store(stored.to_bits(), Ordering::Release);
        }
        stored
    }

    /// Current value in normalized (0–1) form.
    pub fn get_normalized(&self, param: Param) -> f32 {
        param.descriptor().normalize(self.get(param))
    }

    /// Writes a normalized (0–1) value.
    pub fn set_normalized(&self, param: Param, normalized: f32) -> f32 {
        self.set(param, param.descriptor().denormalize(normalized))
    }

    /// Restores every parameter to its default.
    pub fn reset(&self) {
        for param in Param::ALL {
            self.set(param, param.descriptor().default);
        }
    }

    /// Snapshot of all values, as read by the audio thread once per block.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot::from_lookup(|p| {
            self.values
                .get(p.index())
                .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
        })
    }

    /// Writes every value in `snapshot`.
    pub fn apply_snapshot(&self, snapshot: &ParamSnapshot) {
        for param in Param::ALL {
            self.set(param, snapshot.value(param));
        }
    }

    /// All plain values in table order.
    pub fn values(&self) -> [f32; PARAM_COUNT] {
        Param::ALL.map(|p| self.get(p))
    }

    /// Switches the drum mode, moving mode-dependent parameters the user has
    /// not touched to the new mode's defaults.
    ///
    /// Returns the nudges that were written.
    pub fn set_mode(&self, mode: DrumMode) -> Vec<ParamNudge> {
        let current = self.snapshot();
        let nudges: Vec<ParamNudge> = mode_nudges(mode, &current).collect();
        for nudge in &nudges {
            self.set(nudge.param, nudge.value);
        }
        self.set(Param::Mode, mode.index() as f32);

        tracing::debug!(
            from = current.mode.label(),
            to = mode.label(),
            nudged = nudges.len(),
            "drum mode changed"
        );
        nudges
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParamStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for param in Param::ALL {
            map.entry(&param.string_id(), &self.get(param));
        }
        map.finish()
    }
}
