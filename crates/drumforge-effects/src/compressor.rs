//! Feed-forward drum compressor with a filtered sidechain.
//!
//! # Signal Flow
//!
//! ```text
//! Input ─┬─────────────────────────────────→ × ──→ mix ──→ Output
//!        │                                   ↑      ↑
//!        └→ Sidechain HPF → Envelope → Gain Computer │
//!        └───────────────────── dry ──────────────────┘
//! ```
//!
//! The sidechain high-pass keeps low-frequency energy (kick fundamentals,
//! rumble) from pumping the detector. Each channel has its own detector.
//!
//! # Parameters
//!
//! | Parameter | Range | Description |
//! |-----------|-------|-------------|
//! | Threshold | -60 to 0 dB | Level where compression begins |
//! | Ratio | 1:1 to 20:1 | Compression strength |
//! | Attack | 0.1-60 ms | How fast gain reduction engages |
//! | Release | 10-500 ms | How fast gain reduction releases |
//! | Knee | 0-24 dB | Width of the quadratic knee (0 = hard) |
//! | SC HPF | 20-400 Hz | Detector high-pass corner |
//! | Mix | 0-1 | Parallel compression amount |

use drumforge_core::{
    Biquad, ChannelBuffer, EnvelopeFollower, MAX_CHANNELS, db_to_linear, design_is_valid,
    highpass_coefficients, linear_to_db, wet_dry_mix,
};

use crate::params::ParamSnapshot;
use crate::stage::StageOutcome;

/// Q of the sidechain high-pass (Butterworth).
const SIDECHAIN_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Static curve of the compressor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainComputer {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio (n:1).
    pub ratio: f32,
    /// Knee width in dB.
    pub knee_db: f32,
}

impl GainComputer {
    /// Gain change in dB (always ≤ 0) for a detector level in dB.
    #[inline]
    pub fn compute_gain_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;
        let slope = 1.0 - 1.0 / self.ratio;

        if overshoot <= -self.knee_db / 2.0 {
            0.0
        } else if overshoot > self.knee_db / 2.0 {
            -overshoot * slope
        } else {
            let knee_factor = (overshoot + self.knee_db / 2.0) / self.knee_db;
            -knee_factor * knee_factor * overshoot * slope
        }
    }
}

impl From<&ParamSnapshot> for GainComputer {
    fn from(p: &ParamSnapshot) -> Self {
        Self {
            threshold_db: p.comp_threshold_db,
            ratio: p.comp_ratio,
            knee_db: p.comp_knee_db,
        }
    }
}

#[derive(Debug, Clone)]
struct Channel {
    sidechain: Biquad,
    detector: EnvelopeFollower,
}

/// Multichannel compressor stage.
#[derive(Debug, Clone)]
pub struct DrumCompressor {
    channels: [Channel; MAX_CHANNELS],
    sample_rate: f32,
    /// Deepest gain reduction of the last block, in dB (≤ 0).
    last_gain_reduction_db: f32,
}

impl DrumCompressor {
    /// Creates a compressor at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            channels: core::array::from_fn(|_| Channel {
                sidechain: Biquad::new(),
                detector: EnvelopeFollower::new(sample_rate),
            }),
            sample_rate,
            last_gain_reduction_db: 0.0,
        }
    }

    /// Updates the detector sample rate and clears state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for ch in &mut self.channels {
            ch.detector.set_sample_rate(sample_rate);
        }
        self.reset();
    }

    /// Clears detector and sidechain filter state.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.sidechain.clear();
            ch.detector.reset();
        }
        self.last_gain_reduction_db = 0.0;
    }

    /// Deepest gain reduction applied during the last block, in dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_reduction_db
    }

    /// Compresses the active region of `buffer` in place.
    ///
    /// `dry` is scratch storage with at least the shape of `buffer`; it
    /// receives a copy of the stage input. Invalid sidechain coefficients put
    /// the detector filter into passthrough and report
    /// [`StageOutcome::Degraded`]. A non-finite result restores the input.
    pub fn process(
        &mut self,
        buffer: &mut ChannelBuffer,
        dry: &mut ChannelBuffer,
        params: &ParamSnapshot,
    ) -> StageOutcome {
        if !dry.copy_from(buffer) {
            return StageOutcome::Degraded;
        }

        let coeffs_ok = design_is_valid(params.sidechain_hpf_hz, SIDECHAIN_Q, self.sample_rate);
        let coeffs = highpass_coefficients(params.sidechain_hpf_hz, SIDECHAIN_Q, self.sample_rate);
        let computer = GainComputer::from(params);
        let mut outcome = StageOutcome::Ok;
        let mut deepest = 0.0_f32;

        let active = buffer.channels().min(MAX_CHANNELS);
        for ch in 0..active {
            let state = &mut self.channels[ch];
            let installed = coeffs_ok && state.sidechain.set_coefficients_checked(coeffs);
            if !installed {
                state.sidechain.set_passthrough();
                outcome = StageOutcome::Degraded;
            }
            state
                .detector
                .set_times(params.comp_attack_ms, params.comp_release_ms);

            for x in buffer.channel_mut(ch) {
                let key = state.sidechain.process(*x);
                let env = state.detector.process(key);
                let gain_db = computer.compute_gain_db(linear_to_db(env));
                deepest = deepest.min(gain_db);
                *x *= db_to_linear(gain_db);
            }
        }

        if params.comp_mix < 1.0 {
            for ch in 0..active {
                let dry = dry.channel(ch);
                for (wet, &d) in buffer.channel_mut(ch).iter_mut().zip(dry) {
                    *wet = wet_dry_mix(d, *wet, params.comp_mix);
                }
            }
        }

        if !buffer.is_finite() {
            buffer.copy_from(dry);
            self.reset();
            return StageOutcome::Degraded;
        }

        self.last_gain_reduction_db = deepest;
        outcome
    }
}
