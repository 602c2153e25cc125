//! Drumforge Core - DSP primitives for the drum shaping chain
//!
//! This crate provides the building blocks used by `drumforge-effects`,
//! designed for real-time audio processing with zero allocation in the audio
//! path.
//!
//! # Core Abstractions
//!
//! ## Buffers
//!
//! - [`ChannelBuffer`] - Planar scratch buffer, allocated once, reshaped per block
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficient designers
//!   (high-pass, low-pass, low/high shelf, peaking)
//! - [`StateVariableFilter`] - TPT state-variable filter (lowpass/highpass/bandpass)
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] - Attack/release peak envelope
//!
//! ## Anti-Aliasing
//!
//! - [`Oversampler`] - 1×/2×/4× oversampling around a waveshaping closure
//! - [`FixedDelayLine`] - Inline integer delay for latency-matching a bypass path
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Range, kind, skew and identity of a parameter
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`cubic_soft_clip`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! drumforge-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: allocations only in explicit `try_*` constructors
//! - **No dependencies on std**: pure `no_std` with `libm` for math
//! - **Object-safe traits**: [`Effect`] works as `dyn Effect`

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod buffer;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod math;
pub mod oversample;
pub mod param_info;
pub mod svf;

// Re-export main types at crate root
pub use biquad::{
    Biquad, Coefficients, design_is_valid, high_shelf_coefficients, highpass_coefficients,
    low_shelf_coefficients, lowpass_coefficients, peaking_eq_coefficients,
};
pub use buffer::{ChannelBuffer, MAX_BLOCK_SIZE, MAX_CHANNELS};
pub use delay::FixedDelayLine;
pub use effect::Effect;
pub use envelope::{EnvelopeFollower, time_coefficient};
pub use math::{
    cubic_soft_clip, db_to_linear, flush_denormal, lerp, linear_to_db, ms_to_samples, tanh_clip,
    tape_curve, wet_dry_mix,
};
pub use oversample::{MAX_OVERSAMPLE_FACTOR, OversampleFactor, Oversampler};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamKind, ParamScale, ParamUnit};
pub use svf::{StateVariableFilter, SvfOutput};
