//! Envelope-difference transient shaper.
//!
//! Two followers track the rectified input: a fast one (1 ms / 30 ms) and a
//! slow one (20 ms / 200 ms). Their difference marks the attack portion of a
//! hit, the slow envelope alone stands in for the sustain.
//!
//! There is a single follower pair for all channels. It is fed the loudest
//! `|x|` across channels at each sample and the resulting gain is applied to
//! every channel, so stereo hits are shaped without shifting the image.
//!
//! ```text
//! delta        = clamp((fast - slow) * 5, -1, 1)
//! attack_gain  = 10^(delta * attack_db / 20)
//! sustain_gain = 10^((slow - 0.1) * sustain_db * 0.5 / 20)
//! y            = x * attack_gain * sustain_gain
//! ```

use drumforge_core::{ChannelBuffer, EnvelopeFollower, MAX_CHANNELS, db_to_linear};
use libm::fabsf;

use crate::params::ParamSnapshot;
use crate::stage::StageOutcome;

const FAST_ATTACK_MS: f32 = 1.0;
const FAST_RELEASE_MS: f32 = 30.0;
const SLOW_ATTACK_MS: f32 = 20.0;
const SLOW_RELEASE_MS: f32 = 200.0;

/// Attack/sustain shaper with one linked detector pair.
#[derive(Debug, Clone)]
pub struct TransientShaper {
    fast: EnvelopeFollower,
    slow: EnvelopeFollower,
}

impl TransientShaper {
    /// Creates a shaper at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            fast: EnvelopeFollower::with_times(sample_rate, FAST_ATTACK_MS, FAST_RELEASE_MS),
            slow: EnvelopeFollower::with_times(sample_rate, SLOW_ATTACK_MS, SLOW_RELEASE_MS),
        }
    }

    /// Updates follower coefficients and clears the envelopes.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.fast.set_sample_rate(sample_rate);
        self.slow.set_sample_rate(sample_rate);
        self.reset();
    }

    /// Zeroes both envelopes.
    pub fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
    }

    /// Shapes the active region of `buffer` in place.
    pub fn process(&mut self, buffer: &mut ChannelBuffer, params: &ParamSnapshot) -> StageOutcome {
        let attack_db = params.attack_amount_db;
        let sustain_db = params.sustain_amount_db;
        let channels = buffer.channels().min(MAX_CHANNELS);
        if channels == 0 {
            return StageOutcome::Ok;
        }
        for i in 0..buffer.len() {
            let level = (0..channels)
                .map(|ch| fabsf(buffer.channel(ch)[i]))
                .fold(0.0_f32, f32::max);
            let fast = self.fast.process_abs(level);
            let slow = self.slow.process_abs(level);
            let delta = ((fast - slow) * 5.0).clamp(-1.0, 1.0);
            let attack_gain = db_to_linear(delta * attack_db);
            let sustain_gain = db_to_linear((slow - 0.1) * sustain_db * 0.5);
            let g = attack_gain * sustain_gain;
            for ch in 0..channels {
                buffer.channel_mut(ch)[i] *= g;
            }
        }
        StageOutcome::Ok
    }
}
