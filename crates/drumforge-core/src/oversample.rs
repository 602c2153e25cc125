//! Runtime-factor oversampler for anti-aliased waveshaping.
//!
//! Nonlinear stages generate harmonics that can exceed Nyquist and alias back
//! into the audible range. The [`Oversampler`] wraps a per-sample shaping
//! closure:
//!
//! 1. **Upsampling**: linear interpolation to `factor` samples per input
//! 2. **Processing**: the closure runs at `factor ×` the base rate
//! 3. **Downsampling**: 16-tap FIR lowpass and decimation
//!
//! The interpolation phase is chosen per factor so that the decimator's
//! group delay lands on a whole number of base-rate samples. A dry path
//! delayed by [`Oversampler::latency_samples`] is therefore phase aligned
//! with the oversampled path.
//!
//! The factor is chosen at construction. Per-channel filter state is
//! allocated once in [`Oversampler::try_new`]; [`Oversampler::process_with`]
//! never allocates.
//!
//! ```rust
//! use drumforge_core::{ChannelBuffer, OversampleFactor, Oversampler};
//!
//! let mut os = Oversampler::try_new(OversampleFactor::X4, 2).unwrap();
//! let mut buf = ChannelBuffer::new();
//! buf.try_allocate(2, 64).unwrap();
//! assert!(os.process_with(&mut buf, |x| libm::tanhf(3.0 * x)));
//! ```

#[cfg(not(feature = "std"))]
use alloc::collections::TryReserveError;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::TryReserveError;

use crate::buffer::ChannelBuffer;

/// Maximum supported oversampling factor.
pub const MAX_OVERSAMPLE_FACTOR: usize = 4;

/// FIR filter order for anti-aliasing (taps = ORDER + 1).
const FILTER_ORDER: usize = 15;

/// Number of filter taps.
const FILTER_TAPS: usize = FILTER_ORDER + 1;

/// Oversampling factor for nonlinear stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OversampleFactor {
    /// No oversampling.
    X1,
    /// 2× oversampling.
    #[default]
    X2,
    /// 4× oversampling.
    X4,
}

impl OversampleFactor {
    /// Samples processed per input sample.
    pub const fn ratio(self) -> usize {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
        }
    }

    /// Maps a choice index (0 = 1×, 1 = 2×, 2 = 4×). Unknown indices map to 1×.
    pub const fn from_index(index: usize) -> Self {
        match index {
            1 => Self::X2,
            2 => Self::X4,
            _ => Self::X1,
        }
    }

    /// Inverse of [`from_index`](Self::from_index).
    pub const fn index(self) -> usize {
        match self {
            Self::X1 => 0,
            Self::X2 => 1,
            Self::X4 => 2,
        }
    }
}

/// Per-channel interpolation and decimation state.
#[derive(Debug, Clone, Default)]
struct Lane {
    /// Previous input sample for linear interpolation
    prev_sample: f32,
    /// Downsampling filter state (delay line)
    downsample_state: [f32; FILTER_TAPS],
}

/// Multichannel oversampler with a factor fixed at construction.
///
/// # Signal Path
///
/// ```text
/// Input → Linear Interpolation (upsample) → shape at N×fs → FIR Lowpass → Decimation → Output
/// ```
///
/// A 1× oversampler is a no-op wrapper: the closure runs at the base rate and
/// no filter state is touched.
#[derive(Debug, Clone)]
pub struct Oversampler {
    factor: OversampleFactor,
    lanes: Vec<Lane>,
    /// Upsampled work samples for one input sample
    work: [f32; MAX_OVERSAMPLE_FACTOR],
}

impl Oversampler {
    /// Builds an oversampler for `channels` channels.
    ///
    /// This is the only allocating call; it belongs in `prepare`.
    pub fn try_new(factor: OversampleFactor, channels: usize) -> Result<Self, TryReserveError> {
        let mut lanes = Vec::new();
        lanes.try_reserve_exact(channels)?;
        lanes.resize_with(channels, Lane::default);
        #[cfg(feature = "tracing")]
        tracing::debug!(factor = factor.ratio(), channels, "oversampler built");
        Ok(Self {
            factor,
            lanes,
            work: [0.0; MAX_OVERSAMPLE_FACTOR],
        })
    }

    /// The oversampling factor.
    pub fn factor(&self) -> OversampleFactor {
        self.factor
    }

    /// Number of channels with allocated state.
    pub fn channels(&self) -> usize {
        self.lanes.len()
    }

    /// Whether this instance was built for `factor` and `channels`.
    pub fn matches(&self, factor: OversampleFactor, channels: usize) -> bool {
        self.factor == factor && self.lanes.len() == channels
    }

    /// Runs `shape` over every active sample of `buffer` at the oversampled rate.
    ///
    /// Returns `false` without touching the buffer if it has more active
    /// channels than this oversampler was built for.
    pub fn process_with<F>(&mut self, buffer: &mut ChannelBuffer, mut shape: F) -> bool
    where
        F: FnMut(f32) -> f32,
    {
        if buffer.channels() > self.lanes.len() {
            return false;
        }
        let factor = self.factor.ratio();
        if factor == 1 {
            for ch in 0..buffer.channels() {
                for sample in buffer.channel_mut(ch) {
                    *sample = shape(*sample);
                }
            }
            return true;
        }

        let coeffs = coefficients(self.factor);
        let step = 1.0 / factor as f32;
        let phase = interpolation_phase(self.factor) as f32;
        for ch in 0..buffer.channels() {
            let lane = &mut self.lanes[ch];
            for sample in buffer.channel_mut(ch) {
                let input = *sample;
                for i in 0..factor {
                    let t = (i as f32 + 1.0 - phase) * step;
                    self.work[i] = shape(lane.prev_sample + t * (input - lane.prev_sample));
                }
                lane.prev_sample = input;
                *sample = decimate(&mut lane.downsample_state, &self.work[..factor], coeffs);
            }
        }
        true
    }

    /// Clears interpolation and filter state.
    pub fn reset(&mut self) {
        for lane in &mut self.lanes {
            *lane = Lane::default();
        }
        self.work = [0.0; MAX_OVERSAMPLE_FACTOR];
    }

    /// Group delay of the interpolation and decimation filters, in base-rate
    /// samples. Exact: the delay is always a whole number of samples.
    pub fn latency_samples(&self) -> usize {
        match self.factor {
            OversampleFactor::X1 => 0,
            other => (center_tap(other) + interpolation_phase(other)) / other.ratio(),
        }
    }
}

/// Index of the tap the decimation filter is symmetric about.
#[inline]
const fn center_tap(factor: OversampleFactor) -> usize {
    match factor {
        OversampleFactor::X1 => 0,
        OversampleFactor::X2 => 7,
        OversampleFactor::X4 => 8,
    }
}

/// How many oversampled steps the interpolation grid is shifted back so
/// that `center_tap + phase` is a multiple of the ratio.
///
/// Sample `i` of each group sits at `(i + 1 - phase) / ratio` between the
/// previous and the current input.
#[inline]
const fn interpolation_phase(factor: OversampleFactor) -> usize {
    let ratio = factor.ratio();
    (ratio - center_tap(factor) % ratio) % ratio
}

/// Pushes the oversampled samples through the FIR delay line, evaluating the
/// convolution only at the final (decimation) sample.
#[inline]
fn decimate(state: &mut [f32; FILTER_TAPS], samples: &[f32], coeffs: &[f32; FILTER_TAPS]) -> f32 {
    for &s in samples {
        state.copy_within(0..FILTER_TAPS - 1, 1);
        state[0] = s;
    }
    state.iter().zip(coeffs.iter()).map(|(x, c)| x * c).sum()
}

#[inline]
fn coefficients(factor: OversampleFactor) -> &'static [f32; FILTER_TAPS] {
    match factor {
        OversampleFactor::X4 => &COEFFS_4X,
        OversampleFactor::X1 | OversampleFactor::X2 => &COEFFS_2X,
    }
}

// Lowpass FIR filter coefficients for anti-aliasing during downsampling.
//
// Windowed-sinc with Kaiser window (~60 dB stopband). Both sets are odd-length
// symmetric kernels padded to FILTER_TAPS with a zero tap, so they are linear
// phase about `center_tap` (7 for 2×, 8 for 4×). Coefficient sums are
// normalized to ~1.0.
//
// Reference: A.V. Oppenheim & R.W. Schafer, "Discrete-Time Signal Processing",
// Chapter 7.

/// 2× half-band lowpass, cutoff at 0.4 × oversampled Nyquist.
#[allow(clippy::excessive_precision)]
#[rustfmt::skip]
static COEFFS_2X: [f32; FILTER_TAPS] = [
    -0.00152541,  0.00000000,  0.01309369,  0.00000000,
    -0.05738920,  0.00000000,  0.29581875,  0.50000434,
     0.29581875,  0.00000000, -0.05738920,  0.00000000,
     0.01309369,  0.00000000, -0.00152541,  0.00000000,
];

/// 4× lowpass, cutoff at 0.2 × oversampled Nyquist. Tap 0 is the padding.
#[allow(clippy::excessive_precision)]
#[rustfmt::skip]
static COEFFS_4X: [f32; FILTER_TAPS] = [
    0.0000000000, 0.0068385147, 0.0173035284, 0.0343243989,
    0.0572233522, 0.0832448353, 0.1080359819, 0.1262575783,
    0.1335436204, 0.1262575783, 0.1080359819, 0.0832448353,
    0.0572233522, 0.0343243989, 0.0173035284, 0.0068385147,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(channels: usize, len: usize, value: f32) -> ChannelBuffer {
        let mut buf = ChannelBuffer::new();
        buf.try_allocate(channels, len).unwrap();
        for ch in 0..channels {
            buf.channel_mut(ch).fill(value);
        }
        buf
    }

    #[test]
    fn test_factor_index_mapping() {
        for factor in [OversampleFactor::X1, OversampleFactor::X2, OversampleFactor::X4] {
            assert_eq!(OversampleFactor::from_index(factor.index()), factor);
        }
        assert_eq!(OversampleFactor::from_index(9), OversampleFactor::X1);
        assert_eq!(OversampleFactor::X4.ratio(), 4);
    }

    #[test]
    fn test_passthrough_dc_unity() {
        for factor in [OversampleFactor::X2, OversampleFactor::X4] {
            let mut os = Oversampler::try_new(factor, 1).unwrap();
            let mut buf = filled(1, 256, 1.0);
            assert!(os.process_with(&mut buf, |x| x));
            let last = buf.channel(0)[255];
            assert!((last - 1.0).abs() < 0.02, "{factor:?}: got {last}");
        }
    }

    #[test]
    fn test_gain_preserved() {
        let mut os = Oversampler::try_new(OversampleFactor::X4, 2).unwrap();
        let mut buf = filled(2, 256, 1.0);
        assert!(os.process_with(&mut buf, |x| x * 0.5));
        for ch in 0..2 {
            let last = buf.channel(ch)[255];
            assert!((last - 0.5).abs() < 0.02, "Gain should be ~0.5, got {last}");
        }
    }

    #[test]
    fn test_unity_factor_is_exact() {
        let mut os = Oversampler::try_new(OversampleFactor::X1, 1).unwrap();
        let mut buf = filled(1, 8, 0.25);
        assert!(os.process_with(&mut buf, |x| x * 2.0));
        assert!(buf.channel(0).iter().all(|&s| s == 0.5));
        assert_eq!(os.latency_samples(), 0);
    }

    #[test]
    fn test_rejects_too_many_channels() {
        let mut os = Oversampler::try_new(OversampleFactor::X2, 1).unwrap();
        let mut buf = filled(2, 8, 0.25);
        assert!(!os.process_with(&mut buf, |x| x * 2.0));
        assert!(buf.channel(1).iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut os = Oversampler::try_new(OversampleFactor::X4, 1).unwrap();
        let mut buf = filled(1, 64, 1.0);
        os.process_with(&mut buf, |x| x);
        os.reset();

        let mut silence = filled(1, 64, 0.0);
        os.process_with(&mut silence, |x| x);
        assert!(silence.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_latency_reported_at_base_rate() {
        let os2 = Oversampler::try_new(OversampleFactor::X2, 1).unwrap();
        let os4 = Oversampler::try_new(OversampleFactor::X4, 1).unwrap();
        assert_eq!(os2.latency_samples(), 4);
        assert_eq!(os4.latency_samples(), 2);
        assert!(os2.matches(OversampleFactor::X2, 1));
        assert!(!os2.matches(OversampleFactor::X4, 1));
    }

    #[test]
    fn test_impulse_peaks_at_reported_latency() {
        for factor in [OversampleFactor::X2, OversampleFactor::X4] {
            let mut os = Oversampler::try_new(factor, 1).unwrap();
            let mut buf = filled(1, 32, 0.0);
            buf.channel_mut(0)[4] = 1.0;
            assert!(os.process_with(&mut buf, |x| x));

            let out = buf.channel(0);
            let peak = 4 + os.latency_samples();
            let (argmax, _) = out
                .iter()
                .enumerate()
                .fold((0, f32::MIN), |best, (i, &s)| if s > best.1 { (i, s) } else { best });
            assert_eq!(argmax, peak, "{factor:?}");
            // Linear phase: the response is symmetric about the peak
            for k in 1..4 {
                assert!(
                    (out[peak - k] - out[peak + k]).abs() < 1e-5,
                    "{factor:?} k={k}: {} vs {}",
                    out[peak - k],
                    out[peak + k]
                );
            }
        }
    }
}
