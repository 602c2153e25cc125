//! State Variable Filter implementation.
//!
//! Used for the chain's mandatory input high-pass and low-pass filters. The
//! filter computes lowpass, highpass and bandpass simultaneously; each
//! instance selects one output.
//!
//! # Topology
//!
//! Implements the Topology-Preserving Transform (TPT) SVF after Zavalishin,
//! "The Art of VA Filter Design" (2012). The trapezoidal integrators keep the
//! structure stable while the cutoff is changed once per block.
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f32::consts::PI;
use libm::tanf;

use crate::Effect;
use crate::flush_denormal;

/// Lowest cutoff accepted by [`StateVariableFilter::set_cutoff`].
pub const MIN_CUTOFF_HZ: f32 = 5.0;

/// State Variable Filter output type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfOutput {
    /// Low-pass filter output.
    #[default]
    Lowpass,
    /// High-pass filter output.
    Highpass,
    /// Band-pass filter output.
    Bandpass,
}

/// State Variable Filter (2-pole, 12 dB/oct).
///
/// ## Parameters
///
/// - `cutoff`: Filter cutoff frequency in Hz ([`MIN_CUTOFF_HZ`] to sr×0.49, default 1000.0)
/// - `resonance`: Q factor (0.5 to 20.0, default 0.707)
/// - `output_type`: Which filter output to use (default `Lowpass`)
///
/// # Example
///
/// ```rust
/// use drumforge_core::{Effect, StateVariableFilter, SvfOutput};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(30.0);
/// svf.set_output_type(SvfOutput::Highpass);
///
/// let output = svf.process(0.5);
/// assert!(output.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    // Filter state
    ic1eq: f32,
    ic2eq: f32,

    // Coefficients
    g: f32,
    k: f32,

    // Parameters
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    output_type: SvfOutput,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a new SVF with the given sample rate.
    ///
    /// Initialises with cutoff = 1000 Hz, Q = 0.707 (Butterworth), lowpass output.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.707,
            output_type: SvfOutput::Lowpass,
        };
        svf.update_coefficients();
        svf
    }

    /// Create a filter with the given output type and cutoff.
    pub fn with_output(sample_rate: f32, output_type: SvfOutput, cutoff: f32) -> Self {
        let mut svf = Self::new(sample_rate);
        svf.output_type = output_type;
        svf.set_cutoff(cutoff);
        svf
    }

    /// Set cutoff frequency in Hz, clamped to [`MIN_CUTOFF_HZ`]..`sample_rate × 0.49`.
    ///
    /// Skips the `tan` evaluation when the clamped cutoff is unchanged.
    pub fn set_cutoff(&mut self, freq: f32) {
        let clamped = freq.clamp(MIN_CUTOFF_HZ, self.sample_rate * 0.49);
        if clamped != self.cutoff {
            self.cutoff = clamped;
            self.update_coefficients();
        }
    }

    /// Get current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q factor), clamped to 0.5..20.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = q.clamp(0.5, 20.0);
        self.update_coefficients();
    }

    /// Get current resonance (Q factor).
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Set the output type.
    pub fn set_output_type(&mut self, output_type: SvfOutput) {
        self.output_type = output_type;
    }

    /// Get current output type.
    pub fn output_type(&self) -> SvfOutput {
        self.output_type
    }

    fn update_coefficients(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample and return `(lowpass, highpass, bandpass)`.
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        let lp = v2;
        let bp = v1;
        let hp = input - self.k * v1 - v2;

        (lp, hp, bp)
    }
}

impl Effect for StateVariableFilter {
    fn process(&mut self, input: f32) -> f32 {
        let (lp, hp, bp) = self.process_all(input);

        match self.output_type {
            SvfOutput::Lowpass => lp,
            SvfOutput::Highpass => hp,
            SvfOutput::Bandpass => bp,
        }
    }

    fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.clamp(MIN_CUTOFF_HZ, sample_rate * 0.49);
        self.update_coefficients();
    }
}
