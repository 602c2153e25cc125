//! Envelope follower for tracking signal amplitude.
//!
//! Used by the transient shaper (fast/slow pair), the compressor detector
//! and the gate detector.

use libm::expf;

/// One-pole peak envelope follower with separate attack and release.
///
/// Coefficients follow `coeff = exp(-1 / (ms * 0.001 * sr))`. Each step picks
/// the attack coefficient when the input is above the current state and the
/// release coefficient otherwise, then moves the state towards the input:
/// `state = x + coeff * (state - x)`.
///
/// # Example
///
/// ```rust
/// use drumforge_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(48000.0);
/// env.set_attack_ms(10.0);
/// env.set_release_ms(100.0);
///
/// let envelope_level = env.process(-0.5);
/// assert!(envelope_level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    /// Current envelope level (linear)
    envelope: f32,
    /// Attack coefficient
    attack_coeff: f32,
    /// Release coefficient
    release_coeff: f32,
    /// Sample rate
    sample_rate: f32,
    /// Attack time in ms (for recalculation)
    attack_ms: f32,
    /// Release time in ms (for recalculation)
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create a new envelope follower with default attack/release times.
    ///
    /// Defaults:
    /// - Attack: 10ms
    /// - Release: 100ms
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, 10.0, 100.0)
    }

    /// Create with specified attack and release times.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: attack_ms.max(0.1),
            release_ms: release_ms.max(1.0),
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Set the attack time in milliseconds (floored at 0.1 ms).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.1);
        self.recalculate_coefficients();
    }

    /// Get current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds (floored at 1 ms).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.recalculate_coefficients();
    }

    /// Get current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Set both times, recomputing coefficients only when either changed.
    ///
    /// Called once per block by stages whose ballistics are parameters.
    pub fn set_times(&mut self, attack_ms: f32, release_ms: f32) {
        let attack_ms = attack_ms.max(0.1);
        let release_ms = release_ms.max(1.0);
        if attack_ms != self.attack_ms || release_ms != self.release_ms {
            self.attack_ms = attack_ms;
            self.release_ms = release_ms;
            self.recalculate_coefficients();
        }
    }

    /// Update sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Rectify a sample and advance the envelope.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.process_abs(input.abs())
    }

    /// Advance the envelope with an already rectified level.
    #[inline]
    pub fn process_abs(&mut self, level: f32) -> f32 {
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = level + coeff * (self.envelope - level);
        self.envelope
    }

    /// Get current envelope level without processing new input.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = time_coefficient(self.attack_ms, self.sample_rate);
        self.release_coeff = time_coefficient(self.release_ms, self.sample_rate);
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

/// One-pole smoothing coefficient for a time constant in milliseconds.
#[inline]
pub fn time_coefficient(ms: f32, sample_rate: f32) -> f32 {
    expf(-1.0 / (ms * 0.001 * sample_rate))
}
