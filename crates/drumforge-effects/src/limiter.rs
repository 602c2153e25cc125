//! Look-ahead peak-normalizing soft clipper.
//!
//! For each sample the stage peeks `look` samples ahead within the block:
//!
//! ```text
//! j    = min(i + look, N - 1)
//! g    = ceil / |x[j]|  if |x[j]| > ceil, else 1
//! y[i] = soft_clip(x[i] * g / ceil) * ceil
//! ```
//!
//! `soft_clip(v) = clamp(v - v³/3, -1, 1)`, so the output never leaves
//! `±ceil`. Peeking ahead reads only samples that have not been written yet,
//! so the stage runs in place. The look-ahead does not cross block
//! boundaries and adds no latency.

use drumforge_core::{ChannelBuffer, MAX_CHANNELS, cubic_soft_clip, db_to_linear, ms_to_samples};
use libm::fabsf;

use crate::params::ParamSnapshot;
use crate::stage::StageOutcome;

/// Look-ahead distance in samples for `ms` at `sample_rate` (truncated).
#[inline]
pub fn lookahead_samples(ms: f32, sample_rate: f32) -> usize {
    let samples = ms_to_samples(ms, sample_rate);
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Clip/limiter stage. Stateless apart from the sample rate.
#[derive(Debug, Clone, Copy)]
pub struct ClipLimiter {
    sample_rate: f32,
}

impl ClipLimiter {
    /// Creates the stage at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }

    /// Updates the sample rate used for the look-ahead conversion.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Limits the active region of `buffer` in place.
    pub fn process(&mut self, buffer: &mut ChannelBuffer, params: &ParamSnapshot) -> StageOutcome {
        let ceiling = db_to_linear(params.clip_ceiling_db);
        let look = lookahead_samples(params.lookahead_ms, self.sample_rate);
        let channels = buffer.channels().min(MAX_CHANNELS);
        for ch in 0..channels {
            limit_channel(buffer.channel_mut(ch), ceiling, look);
        }
        StageOutcome::Ok
    }
}

/// Applies the look-ahead soft clip to one channel.
pub fn limit_channel(x: &mut [f32], ceiling: f32, look: usize) {
    let n = x.len();
    if n == 0 {
        return;
    }
    for i in 0..n {
        let j = i.saturating_add(look).min(n - 1);
        let ahead = fabsf(x[j]);
        let g = if ahead > ceiling { ceiling / ahead } else { 1.0 };
        x[i] = cubic_soft_clip(x[i] * g / ceiling) * ceiling;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookahead_conversion_truncates() {
        assert_eq!(lookahead_samples(0.5, 48000.0), 24);
        assert_eq!(lookahead_samples(0.0, 48000.0), 0);
        assert_eq!(lookahead_samples(3.0, 44100.0), 132);
        assert_eq!(lookahead_samples(f32::NAN, 48000.0), 0);
    }

    #[test]
    fn test_output_within_ceiling() {
        let ceiling = db_to_linear(-3.0);
        let mut x: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.37).sin() * 4.0).collect();
        limit_channel(&mut x, ceiling, 24);
        assert!(x.iter().all(|s| s.abs() <= ceiling * (1.0 + 1e-6)));
    }

    #[test]
    fn test_impulse_ahead_pre_reduces() {
        let ceiling = db_to_linear(-6.0);
        let look = 24;
        let mut x = vec![0.0_f32; 128];
        x[10] = 0.01;
        x[10 + look] = 2.0;
        limit_channel(&mut x, ceiling, look);
        let g = ceiling / 2.0;
        let expected = cubic_soft_clip(0.01 * g / ceiling) * ceiling;
        assert!((x[10] - expected).abs() < 1e-9);
        assert!((x[10] - 0.01 * g).abs() < 1e-6);
    }

    #[test]
    fn test_lookahead_clamps_to_block_end() {
        let ceiling = 1.0;
        let mut x = vec![0.0_f32; 8];
        x[7] = 0.5;
        limit_channel(&mut x, ceiling, 100);
        // Every sample peeks at the last one; 0.5 < ceiling so no pre-gain
        let expected = cubic_soft_clip(0.5);
        assert!((x[7] - expected).abs() < 1e-7);
    }

    #[test]
    fn test_quiet_signal_nearly_unchanged() {
        let mut limiter = ClipLimiter::new(48000.0);
        let mut buf = ChannelBuffer::new();
        buf.try_allocate(1, 64).unwrap();
        buf.channel_mut(0).fill(0.001);
        limiter.process(&mut buf, &ParamSnapshot::default());
        assert!((buf.channel(0)[0] - 0.001).abs() < 1e-6);
    }
}
