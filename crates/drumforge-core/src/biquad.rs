//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR filter plus the coefficient designers
//! the drum chain needs: high-pass (sidechain detector), low/high shelf (tilt
//! pair) and peaking EQ (body band).
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas. Designers
//! return raw `(b0, b1, b2, a0, a1, a2)` tuples; [`Biquad::set_coefficients_checked`]
//! rejects numerically invalid designs and falls back to a unity passthrough.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

use crate::math::flush_denormal;

/// Raw, un-normalized biquad coefficients: `(b0, b1, b2, a0, a1, a2)`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Unity passthrough coefficients.
pub const PASSTHROUGH: Coefficients = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Changing coefficients keeps the delay lines, so designs can be
/// recomputed once per block without clicks from a state reset.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f32,
    b1: f32,
    b2: f32,

    /// Feedback coefficients (normalized by a0)
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients.
    ///
    /// Normalizes by `a0` internally. No validation; see
    /// [`set_coefficients_checked`](Self::set_coefficients_checked).
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Sets coefficients if they are numerically usable.
    ///
    /// Returns `false` and installs unity passthrough coefficients when `a0`
    /// is zero or any normalized coefficient is not finite. Filter memory is
    /// kept either way.
    pub fn set_coefficients_checked(&mut self, coeffs: Coefficients) -> bool {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        if a0 == 0.0 || !a0.is_finite() {
            self.set_passthrough();
            return false;
        }
        let a0_inv = 1.0 / a0;
        let normalized = [b0 * a0_inv, b1 * a0_inv, b2 * a0_inv, a1 * a0_inv, a2 * a0_inv];
        if normalized.iter().any(|c| !c.is_finite()) {
            self.set_passthrough();
            return false;
        }
        [self.b0, self.b1, self.b2, self.a1, self.a2] = normalized;
        true
    }

    /// Installs unity passthrough coefficients.
    pub fn set_passthrough(&mut self) {
        let (b0, b1, b2, a0, a1, a2) = PASSTHROUGH;
        self.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    /// Whether the current coefficients are the unity passthrough.
    pub fn is_passthrough(&self) -> bool {
        self.b0 == 1.0 && self.b1 == 0.0 && self.b2 == 0.0 && self.a1 == 0.0 && self.a2 == 0.0
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }

    /// Processes a buffer in place.
    #[inline]
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter state (delay lines).
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a design at `frequency`/`q` is representable at `sample_rate`.
///
/// The frequency must lie strictly between 0 and Nyquist and Q must be
/// positive; all three must be finite.
pub fn design_is_valid(frequency: f32, q: f32, sample_rate: f32) -> bool {
    frequency.is_finite()
        && q.is_finite()
        && sample_rate.is_finite()
        && sample_rate > 0.0
        && q > 0.0
        && frequency > 0.0
        && frequency < sample_rate * 0.5
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (typically 0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (typically 0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates peaking EQ filter coefficients using the RBJ cookbook formula.
///
/// Boosts or cuts around a center frequency with a bandwidth set by `q`.
///
/// # Arguments
///
/// * `frequency` - Center frequency in Hz
/// * `q` - Q factor (bandwidth = frequency / Q)
/// * `gain_db` - Gain in decibels (positive = boost, negative = cut)
/// * `sample_rate` - Sample rate in Hz
pub fn peaking_eq_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha / a;

    (b0, b1, b2, a0, a1, a2)
}

/// Shared shelf terms: `(A, cos ω, β)` with `β = sin ω · √A / Q`.
fn shelf_terms(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> (f32, f32, f32) {
    let a = powf(10.0, gain_db / 40.0);
    let omega = 2.0 * PI * frequency / sample_rate;
    let beta = sinf(omega) * sqrtf(a) / q;
    (a, cosf(omega), beta)
}

/// Calculates low-shelf coefficients.
///
/// Gain below `frequency` approaches `gain_db`; above it the response is flat
/// at unity.
pub fn low_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Coefficients {
    let (a, cos_omega, beta) = shelf_terms(frequency, q, gain_db, sample_rate);
    let a_plus = a + 1.0;
    let a_minus = a - 1.0;
    let a_minus_cos = a_minus * cos_omega;

    let b0 = a * (a_plus - a_minus_cos + beta);
    let b1 = a * 2.0 * (a_minus - a_plus * cos_omega);
    let b2 = a * (a_plus - a_minus_cos - beta);
    let a0 = a_plus + a_minus_cos + beta;
    let a1 = -2.0 * (a_minus + a_plus * cos_omega);
    let a2 = a_plus + a_minus_cos - beta;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-shelf coefficients.
///
/// Mirror image of [`low_shelf_coefficients`]: gain above `frequency`
/// approaches `gain_db`.
pub fn high_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Coefficients {
    let (a, cos_omega, beta) = shelf_terms(frequency, q, gain_db, sample_rate);
    let a_plus = a + 1.0;
    let a_minus = a - 1.0;
    let a_minus_cos = a_minus * cos_omega;

    let b0 = a * (a_plus + a_minus_cos + beta);
    let b1 = -2.0 * a * (a_minus + a_plus * cos_omega);
    let b2 = a * (a_plus + a_minus_cos - beta);
    let a0 = a_plus - a_minus_cos + beta;
    let a1 = 2.0 * (a_minus - a_plus * cos_omega);
    let a2 = a_plus - a_minus_cos - beta;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(biquad: &mut Biquad, input: f32, samples: usize) -> f32 {
        let mut output = 0.0;
        for _ in 0..samples {
            output = biquad.process(input);
        }
        output
    }

    fn nyquist_gain(biquad: &mut Biquad) -> f32 {
        let mut peak = 0.0_f32;
        for i in 0..4000 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = biquad.process(x);
            if i > 3000 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn test_biquad_passthrough() {
        let mut biquad = Biquad::new();
        assert!(biquad.is_passthrough());

        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 0.0001);
        }
    }

    #[test]
    fn test_biquad_clear() {
        let mut biquad = Biquad::new();
        for _ in 0..10 {
            biquad.process(1.0);
        }

        biquad.clear();

        assert_eq!(biquad.x1, 0.0);
        assert_eq!(biquad.x2, 0.0);
        assert_eq!(biquad.y1, 0.0);
        assert_eq!(biquad.y2, 0.0);
    }

    #[test]
    fn test_biquad_lowpass_dc_pass() {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        let output = settle(&mut biquad, 1.0, 1000);
        assert!((output - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut biquad = Biquad::new();
        assert!(biquad.set_coefficients_checked(highpass_coefficients(90.0, 0.707, 48000.0)));
        let output = settle(&mut biquad, 1.0, 48000);
        assert!(output.abs() < 1e-3, "DC leaked through HPF: {output}");
    }

    #[test]
    fn test_checked_rejects_invalid() {
        let mut biquad = Biquad::new();
        assert!(biquad.set_coefficients_checked(peaking_eq_coefficients(
            180.0, 1.2, 6.0, 48000.0
        )));
        assert!(!biquad.is_passthrough());

        assert!(!biquad.set_coefficients_checked((1.0, 0.0, 0.0, 0.0, 0.0, 0.0)));
        assert!(biquad.is_passthrough());

        assert!(!biquad.set_coefficients_checked((f32::NAN, 0.0, 0.0, 1.0, 0.0, 0.0)));
        assert!(biquad.is_passthrough());
    }

    #[test]
    fn test_design_validity() {
        assert!(design_is_valid(650.0, 0.707, 48000.0));
        assert!(!design_is_valid(0.0, 0.707, 48000.0));
        assert!(!design_is_valid(24000.0, 0.707, 48000.0));
        assert!(!design_is_valid(650.0, 0.0, 48000.0));
        assert!(!design_is_valid(650.0, 0.707, f32::NAN));
    }

    #[test]
    fn test_peaking_eq_unity_at_zero_gain() {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = peaking_eq_coefficients(1000.0, 1.0, 0.0, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        let output = settle(&mut biquad, 1.0, 1000);
        assert!((output - 1.0).abs() < 0.05, "DC should pass at 0dB gain, got {}", output);
    }

    #[test]
    fn test_low_shelf_gains() {
        let mut biquad = Biquad::new();
        assert!(biquad.set_coefficients_checked(low_shelf_coefficients(
            650.0, 0.707, 6.0, 48000.0
        )));
        let dc = settle(&mut biquad, 1.0, 20000);
        assert!((dc - db_gain(6.0)).abs() < 0.02, "DC gain {dc}");

        biquad.clear();
        let hf = nyquist_gain(&mut biquad);
        assert!((hf - 1.0).abs() < 0.02, "Nyquist gain {hf}");
    }

    #[test]
    fn test_high_shelf_gains() {
        let mut biquad = Biquad::new();
        assert!(biquad.set_coefficients_checked(high_shelf_coefficients(
            650.0, 0.707, -6.0, 48000.0
        )));
        let dc = settle(&mut biquad, 1.0, 20000);
        assert!((dc - 1.0).abs() < 0.02, "DC gain {dc}");

        biquad.clear();
        let hf = nyquist_gain(&mut biquad);
        assert!((hf - db_gain(-6.0)).abs() < 0.02, "Nyquist gain {hf}");
    }

    fn db_gain(db: f32) -> f32 {
        powf(10.0, db / 20.0)
    }
}
