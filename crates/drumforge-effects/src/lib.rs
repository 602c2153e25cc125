//! drumforge Effects - the drum-shaping chain
//!
//! This crate builds the drum stages on top of drumforge-core and strings
//! them together in [`DrumChain`]:
//!
//! - [`InputFilters`] - Mandatory high-pass / low-pass pair
//! - [`TransientShaper`] - Envelope-difference attack and sustain shaping
//! - [`DrumCompressor`] - Feed-forward compressor with sidechain high-pass
//! - [`Saturator`] - Tanh / diode / tape waveshaper, optionally oversampled
//! - [`ToneShaper`] - Tilt shelves and body peak
//! - [`Gate`] - Linked gate with hysteresis
//! - [`ClipLimiter`] - Look-ahead soft clipper
//!
//! Parameters are described by the static [`DESCRIPTORS`] table and read by
//! the chain once per block as a [`ParamSnapshot`].
//!
//! ## Example
//!
//! ```rust
//! use drumforge_effects::{ChainConfig, DrumChain, DrumMode, Param, ParamSnapshot};
//!
//! let params = ParamSnapshot::default()
//!     .with_value(Param::Mode, DrumMode::Kick.index() as f32)
//!     .with_value(Param::SatDrive, 12.0);
//!
//! let mut chain = DrumChain::new();
//! chain.prepare(ChainConfig::new(44100.0, 256, 1), &params).unwrap();
//!
//! let mut samples = vec![0.25_f32; 256];
//! chain.process_block(&mut [&mut samples[..]], &params);
//! assert!(samples.iter().all(|s| s.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chain;
pub mod compressor;
pub mod filters;
pub mod gate;
pub mod limiter;
pub mod mode;
pub mod params;
pub mod saturator;
pub mod stage;
pub mod tone;
pub mod transient;

// Re-export main types at crate root
pub use chain::{
    AUTO_GAIN_LIMIT_DB, BlockStatus, ChainConfig, DrumChain, MAX_IO_CHANNELS, PrepareError,
    PrepareReport, auto_gain_db, output_gain_db,
};
pub use compressor::{DrumCompressor, GainComputer};
pub use filters::InputFilters;
pub use gate::{Gate, GateCurve};
pub use limiter::{ClipLimiter, limit_channel, lookahead_samples};
pub use mode::{
    MODE_DEPENDENT, ModeDefaults, NUDGE_TOLERANCE, ParamNudge, apply_mode, mode_nudges,
};
pub use params::{
    DESCRIPTORS, DrumMode, PARAM_COUNT, PARAM_ID_BASE, Param, ParamSnapshot, SaturationType,
};
pub use saturator::{Saturator, Shaper, diode_curve};
pub use stage::StageOutcome;
pub use tone::ToneShaper;
pub use transient::TransientShaper;

pub use drumforge_core::OversampleFactor;
