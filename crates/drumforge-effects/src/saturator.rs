//! Waveshaping saturator with optional oversampling.
//!
//! Three curves share one drive/bias front end:
//!
//! | Curve | Transfer function |
//! |-------|-------------------|
//! | Tanh | `tanh(u)` |
//! | Diode | `tanh(u·(1+3a))` for `u > 0`, `tanh(u·(1-2a))` for `u < 0`, `0.2·u` at zero |
//! | Tape | `u / (1 + 0.6·|u|)` |
//!
//! where `u = x·drive + bias`, `drive = 10^(dB/20)` and
//! `bias = 10^(biasDb/20) - 1`. The output is `lerp(x, shaped, mix)`.
//!
//! The oversampling factor is fixed by [`Saturator::prepare`]; changing the
//! parameter takes effect on the next prepare.

#[cfg(not(feature = "std"))]
use alloc::collections::TryReserveError;
#[cfg(feature = "std")]
use std::collections::TryReserveError;

use drumforge_core::{
    ChannelBuffer, OversampleFactor, Oversampler, db_to_linear, lerp, tanh_clip, tape_curve,
};
use libm::tanhf;

use crate::params::{ParamSnapshot, SaturationType};
use crate::stage::StageOutcome;

/// Diode-style asymmetric curve. `asym` widens the positive half and
/// narrows the negative half.
#[inline]
pub fn diode_curve(u: f32, asym: f32) -> f32 {
    let pos = if u > 0.0 { tanhf(u * (1.0 + asym * 3.0)) } else { u * 0.2 };
    let neg = if u < 0.0 { tanhf(u * (1.0 - asym * 2.0)) } else { u * 0.2 };
    if u >= 0.0 { pos } else { neg }
}

/// Per-block shaping settings, resolved from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shaper {
    curve: SaturationType,
    drive: f32,
    bias: f32,
    asym: f32,
    mix: f32,
}

impl Shaper {
    /// Resolves the saturation parameters of `params`.
    pub fn from_params(params: &ParamSnapshot) -> Self {
        Self {
            curve: params.sat_type,
            drive: db_to_linear(params.sat_drive_db),
            bias: db_to_linear(params.sat_bias_db) - 1.0,
            asym: params.sat_asym,
            mix: params.sat_mix,
        }
    }

    /// Shapes one sample.
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        let u = x * self.drive + self.bias;
        let y = match self.curve {
            SaturationType::Tanh => tanh_clip(u),
            SaturationType::Diode => diode_curve(u, self.asym),
            SaturationType::Tape => tape_curve(u),
        };
        lerp(x, y, self.mix)
    }
}

/// Saturation stage. Owns the oversampler.
#[derive(Debug, Clone, Default)]
pub struct Saturator {
    oversampler: Option<Oversampler>,
}

impl Saturator {
    /// Creates a saturator with no oversampler; call [`prepare`](Self::prepare).
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)builds the oversampler for `factor` and `channels`.
    ///
    /// An existing oversampler with the same factor and channel count is
    /// kept and only reset. If allocation fails the stage runs at 1× and the
    /// error is returned so the caller can report it.
    pub fn prepare(
        &mut self,
        factor: OversampleFactor,
        channels: usize,
    ) -> Result<(), TryReserveError> {
        if let Some(os) = self
            .oversampler
            .as_mut()
            .filter(|os| os.matches(factor, channels))
        {
            os.reset();
            return Ok(());
        }
        self.oversampler = None;
        match Oversampler::try_new(factor, channels) {
            Ok(os) => {
                self.oversampler = Some(os);
                Ok(())
            }
            Err(err) => {
                self.oversampler = Oversampler::try_new(OversampleFactor::X1, channels).ok();
                Err(err)
            }
        }
    }

    /// Drops the oversampler.
    pub fn release(&mut self) {
        self.oversampler = None;
    }

    /// Clears oversampler state.
    pub fn reset(&mut self) {
        if let Some(os) = self.oversampler.as_mut() {
            os.reset();
        }
    }

    /// Factor currently in use, if prepared.
    pub fn factor(&self) -> Option<OversampleFactor> {
        self.oversampler.as_ref().map(Oversampler::factor)
    }

    /// Latency added by oversampling, in base-rate samples.
    pub fn latency_samples(&self) -> usize {
        self.oversampler
            .as_ref()
            .map_or(0, Oversampler::latency_samples)
    }

    /// Saturates the active region of `buffer` in place.
    ///
    /// `dry` is scratch storage with at least the shape of `buffer`; it
    /// receives a copy of the stage input. Skipped entirely when the mix is
    /// zero. Without a usable oversampler the block is left unshaped and the
    /// stage reports [`StageOutcome::Degraded`]. A non-finite result restores
    /// the input, clears the oversampler and is also
    /// [`StageOutcome::Degraded`].
    pub fn process(
        &mut self,
        buffer: &mut ChannelBuffer,
        dry: &mut ChannelBuffer,
        params: &ParamSnapshot,
    ) -> StageOutcome {
        if params.sat_mix <= 0.0 {
            return StageOutcome::Ok;
        }
        let shaper = Shaper::from_params(params);
        let Some(os) = self.oversampler.as_mut() else {
            return StageOutcome::Degraded;
        };
        if !dry.copy_from(buffer) || !os.process_with(buffer, |x| shaper.apply(x)) {
            return StageOutcome::Degraded;
        }
        if !buffer.is_finite() {
            buffer.copy_from(dry);
            os.reset();
            return StageOutcome::Degraded;
        }
        StageOutcome::Ok
    }
}
