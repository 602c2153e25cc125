//! Linked expander-style noise gate with hysteresis.
//!
//! The detector follows the mean of `|x|` across channels, and the same gain
//! is applied to every channel so the stereo image never shifts.
//!
//! ```text
//! thr       = 10^(threshold_db / 20)
//! thr_close = 10^((threshold_db - hysteresis_db) / 20)
//!
//! e > thr        → 1
//! e < thr_close  → (e / thr_close)^ratio
//! otherwise      → 1
//! ```

use drumforge_core::{ChannelBuffer, EnvelopeFollower, MAX_CHANNELS, db_to_linear};
use libm::{fabsf, powf};

use crate::params::ParamSnapshot;
use crate::stage::StageOutcome;

/// Static gain curve of the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateCurve {
    /// Open threshold (linear).
    pub thr: f32,
    /// Close threshold (linear), `thr` lowered by the hysteresis.
    pub thr_close: f32,
    /// Expansion ratio below `thr_close`.
    pub ratio: f32,
}

impl GateCurve {
    /// Curve for the gate parameters of `params`.
    pub fn from_params(params: &ParamSnapshot) -> Self {
        Self {
            thr: db_to_linear(params.gate_threshold_db),
            thr_close: db_to_linear(params.gate_threshold_db - params.gate_hysteresis_db),
            ratio: params.gate_ratio,
        }
    }

    /// Gain for detector level `e`.
    #[inline]
    pub fn gain(&self, e: f32) -> f32 {
        if e > self.thr {
            1.0
        } else if e < self.thr_close {
            powf(e / self.thr_close, self.ratio)
        } else {
            1.0
        }
    }
}

/// Noise gate stage.
#[derive(Debug, Clone)]
pub struct Gate {
    envelope: EnvelopeFollower,
}

impl Gate {
    /// Creates a gate at `sample_rate` with default ballistics.
    pub fn new(sample_rate: f32) -> Self {
        let defaults = ParamSnapshot::default();
        Self {
            envelope: EnvelopeFollower::with_times(
                sample_rate,
                defaults.gate_attack_ms,
                defaults.gate_release_ms,
            ),
        }
    }

    /// Updates the detector sample rate and clears the envelope.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
        self.envelope.reset();
    }

    /// Clears the envelope.
    pub fn reset(&mut self) {
        self.envelope.reset();
    }

    /// Current detector level.
    pub fn envelope(&self) -> f32 {
        self.envelope.level()
    }

    /// Gates the active region of `buffer` in place.
    pub fn process(&mut self, buffer: &mut ChannelBuffer, params: &ParamSnapshot) -> StageOutcome {
        let channels = buffer.channels().min(MAX_CHANNELS);
        if channels == 0 {
            return StageOutcome::Ok;
        }
        self.envelope
            .set_times(params.gate_attack_ms, params.gate_release_ms);
        let curve = GateCurve::from_params(params);
        let scale = 1.0 / channels as f32;

        for i in 0..buffer.len() {
            let sum: f32 = (0..channels).map(|ch| fabsf(buffer.channel(ch)[i])).sum();
            let e = self.envelope.process_abs(sum * scale);
            let g = curve.gain(e);
            for ch in 0..channels {
                buffer.channel_mut(ch)[i] *= g;
            }
        }
        StageOutcome::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_regions() {
        let curve = GateCurve::from_params(&ParamSnapshot {
            gate_threshold_db: -20.0,
            gate_hysteresis_db: 6.0,
            gate_ratio: 2.0,
            ..ParamSnapshot::default()
        });
        assert_eq!(curve.gain(1.0), 1.0);
        assert_eq!(curve.gain(curve.thr_close), 1.0);
        // Between close and open thresholds the gate stays open
        assert_eq!(curve.gain((curve.thr + curve.thr_close) * 0.5), 1.0);
        let e = curve.thr_close * 0.5;
        assert!((curve.gain(e) - 0.25).abs() < 1e-6);
        assert_eq!(curve.gain(0.0), 0.0);
    }

    #[test]
    fn test_quiet_signal_is_attenuated() {
        let mut gate = Gate::new(48000.0);
        let params = ParamSnapshot {
            gate_threshold_db: -20.0,
            gate_ratio: 8.0,
            ..ParamSnapshot::default()
        };
        let mut buf = ChannelBuffer::new();
        buf.try_allocate(2, 4800).unwrap();
        for ch in 0..2 {
            buf.channel_mut(ch).fill(0.01);
        }
        gate.process(&mut buf, &params);
        assert!(buf.channel(0)[4799] < 0.001);
        assert_eq!(buf.channel(0), buf.channel(1));
    }

    #[test]
    fn test_loud_signal_passes() {
        let mut gate = Gate::new(48000.0);
        let params = ParamSnapshot {
            gate_threshold_db: -40.0,
            ..ParamSnapshot::default()
        };
        let mut buf = ChannelBuffer::new();
        buf.try_allocate(1, 4800).unwrap();
        buf.channel_mut(0).fill(0.5);
        gate.process(&mut buf, &params);
        assert_eq!(buf.channel(0)[4799], 0.5);
    }

    #[test]
    fn test_same_gain_on_all_channels() {
        let mut gate = Gate::new(48000.0);
        let params = ParamSnapshot {
            gate_threshold_db: -10.0,
            ..ParamSnapshot::default()
        };
        let mut buf = ChannelBuffer::new();
        buf.try_allocate(2, 256).unwrap();
        buf.channel_mut(0).fill(0.2);
        buf.channel_mut(1).fill(0.1);
        gate.process(&mut buf, &params);
        for i in 0..256 {
            let ratio = buf.channel(0)[i] / buf.channel(1)[i];
            assert!((ratio - 2.0).abs() < 1e-5);
        }
    }
}
