//! Per-sample processor trait.
//!
//! The [`Effect`] trait is the seam between mono, sample-at-a-time DSP
//! building blocks and the multichannel stages built on top of them. Each
//! channel of a stage owns its own instance.
//!
//! - **Object-safe**: usable as `dyn Effect`, although the drum stages use
//!   concrete types.
//! - **No allocations**: every method is callable from the audio thread.

/// Core trait for mono audio processors.
///
/// # Example
///
/// ```rust
/// use drumforge_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain { gain: 0.5 };
/// let mut block = [1.0, -1.0];
/// gain.process_block_inplace(&mut block);
/// assert_eq!(block, [0.5, -0.5]);
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in place.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and recompute rate-dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without changing parameters.
    fn reset(&mut self);

    /// Processing latency in samples. Defaults to 0.
    fn latency_samples(&self) -> usize {
        0
    }
}
