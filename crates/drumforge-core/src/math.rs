//! Mathematical utility functions for DSP.
//!
//! Provides the level conversions, interpolation and clipping helpers shared by
//! every drum stage. All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Waveshaping / Clipping
//!
//! | Function | Character | Use Case |
//! |----------|-----------|----------|
//! | [`cubic_soft_clip`] | Polynomial knee, hard bound at ±1 | Output clipper |
//! | [`tanh_clip`] | Smooth, asymptotic | Saturation |
//! | [`tape_curve`] | Rational, gentle | Tape-style saturation |
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`ms_to_samples`] - Time conversion
//! - [`flush_denormal`] - Denormal suppression for filter feedback paths

use libm::{logf, powf, tanhf};

/// Convert decibels to linear gain: `10^(dB/20)`.
///
/// # Example
/// ```rust
/// use drumforge_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Convert linear gain to decibels.
///
/// Input is floored at `1e-10` (-200 dB) so silence maps to a finite level.
///
/// # Example
/// ```rust
/// use drumforge_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Cubic soft clipper: `clamp(v - v³/3, -1, 1)`.
///
/// Unity slope at the origin, flattening towards ±2/3 at |v| = 1. The
/// final clamp guarantees the output never leaves `[-1, 1]` for any finite
/// input.
#[inline]
pub fn cubic_soft_clip(v: f32) -> f32 {
    (v - v * v * v / 3.0).clamp(-1.0, 1.0)
}

/// Hyperbolic tangent saturation.
#[inline]
pub fn tanh_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Rational tape curve `x / (1 + 0.6|x|)`.
///
/// Approaches ±1/0.6 asymptotically; softer than tanh at the same drive.
#[inline]
pub fn tape_curve(x: f32) -> f32 {
    x / (1.0 + 0.6 * x.abs())
}

/// Linear interpolation between `a` and `b`.
///
/// `t = 0` returns `a` exactly.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * 0.001 * sample_rate
}

/// Flush denormals to zero.
///
/// Filter state that decays towards zero can enter the subnormal range,
/// which is very slow on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between a processed and an untouched signal.
///
/// Evaluated as `wet * mix + dry * (1 - mix)` so that `mix = 0` returns `dry`
/// bit-exactly and `mix = 1` returns `wet` bit-exactly for finite inputs.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    wet * mix + dry * (1.0 - mix)
}
