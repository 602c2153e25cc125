//! Tilt EQ and body peak.
//!
//! A complementary shelf pair pivoting at 650 Hz tilts the spectrum (the low
//! shelf gets `+tilt`, the high shelf `-tilt`), then a peaking filter at the
//! body frequency adds or removes weight. All three filters are redesigned
//! every block and applied low shelf → high shelf → peak.

use drumforge_core::{
    Biquad, ChannelBuffer, Coefficients, MAX_CHANNELS, design_is_valid, high_shelf_coefficients,
    low_shelf_coefficients, peaking_eq_coefficients,
};

use crate::params::ParamSnapshot;
use crate::stage::StageOutcome;

/// Tilt pivot frequency in Hz.
pub const TILT_PIVOT_HZ: f32 = 650.0;
/// Shelf Q.
pub const TILT_Q: f32 = 0.707;
/// Body peak Q.
pub const BODY_Q: f32 = 1.2;

#[derive(Debug, Clone, Default)]
struct Channel {
    low_shelf: Biquad,
    high_shelf: Biquad,
    body: Biquad,
}

/// Tilt + body filters for each channel.
#[derive(Debug, Clone)]
pub struct ToneShaper {
    channels: [Channel; MAX_CHANNELS],
    sample_rate: f32,
}

impl ToneShaper {
    /// Creates the stage with every filter in passthrough.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            channels: core::array::from_fn(|_| Channel::default()),
            sample_rate,
        }
    }

    /// Sets the design sample rate and clears state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    /// Clears filter memory.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.low_shelf.clear();
            ch.high_shelf.clear();
            ch.body.clear();
        }
    }

    fn design(&self, frequency: f32, q: f32, coeffs: Coefficients) -> Option<Coefficients> {
        design_is_valid(frequency, q, self.sample_rate).then_some(coeffs)
    }

    /// Filters the active region of `buffer` in place.
    ///
    /// A filter whose design is invalid at the current sample rate runs as
    /// passthrough for the block and the stage reports
    /// [`StageOutcome::Degraded`].
    pub fn process(&mut self, buffer: &mut ChannelBuffer, params: &ParamSnapshot) -> StageOutcome {
        let sr = self.sample_rate;
        let low = self.design(
            TILT_PIVOT_HZ,
            TILT_Q,
            low_shelf_coefficients(TILT_PIVOT_HZ, TILT_Q, params.tilt_db, sr),
        );
        let high = self.design(
            TILT_PIVOT_HZ,
            TILT_Q,
            high_shelf_coefficients(TILT_PIVOT_HZ, TILT_Q, -params.tilt_db, sr),
        );
        let body = self.design(
            params.body_hz,
            BODY_Q,
            peaking_eq_coefficients(params.body_hz, BODY_Q, params.body_gain_db, sr),
        );

        let mut ok = true;
        let active = buffer.channels().min(MAX_CHANNELS);
        for ch in 0..active {
            let state = &mut self.channels[ch];
            for (filter, design) in [
                (&mut state.low_shelf, low),
                (&mut state.high_shelf, high),
                (&mut state.body, body),
            ] {
                let installed = design.is_some_and(|c| filter.set_coefficients_checked(c));
                if !installed {
                    filter.set_passthrough();
                    ok = false;
                }
            }

            let samples = buffer.channel_mut(ch);
            state.low_shelf.process_block_inplace(samples);
            state.high_shelf.process_block_inplace(samples);
            state.body.process_block_inplace(samples);
        }
        StageOutcome::degraded_unless(ok)
    }
}
