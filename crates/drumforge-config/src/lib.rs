//! Parameter storage and persistence for drumforge.
//!
//! - [`ParamStore`] - lock-free shared parameter values, read by the audio
//!   thread as a [`ParamSnapshot`](drumforge_effects::ParamSnapshot) once per block
//! - [`save_state`] / [`restore_state`] - opaque host state blob
//! - [`Preset`] - human-editable TOML presets, with factory presets per
//!   drum mode
//!
//! ## Example
//!
//! ```rust
//! use drumforge_config::{ParamStore, get_factory_preset, restore_state, save_state};
//! use drumforge_effects::DrumMode;
//!
//! let store = ParamStore::new();
//! get_factory_preset("kick_punch").unwrap().apply(&store).unwrap();
//! assert_eq!(store.snapshot().mode, DrumMode::Kick);
//!
//! let blob = save_state(&store).unwrap();
//! let restored = ParamStore::new();
//! assert!(restore_state(&restored, &blob));
//! assert_eq!(restored.snapshot(), store.snapshot());
//! ```

pub mod error;
pub mod factory_presets;
pub mod paths;
pub mod preset;
pub mod state;
pub mod store;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path,
    user_presets_dir,
};
pub use preset::Preset;
pub use state::{STATE_VERSION, decode_state, load_state, restore_state, save_state};
pub use store::ParamStore;
