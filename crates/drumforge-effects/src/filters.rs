//! Mandatory input filters: high-pass then low-pass, per channel.
//!
//! Both are TPT state-variable filters with only the cutoff exposed. They
//! are the one stage whose failure the chain does not paper over with the
//! dry signal: a non-finite result here means the block is zeroed.

use drumforge_core::{ChannelBuffer, Effect, MAX_CHANNELS, StateVariableFilter, SvfOutput};

use crate::params::ParamSnapshot;
use crate::stage::StageOutcome;

/// HPF → LPF pair for each channel.
#[derive(Debug, Clone)]
pub struct InputFilters {
    hpf: [StateVariableFilter; MAX_CHANNELS],
    lpf: [StateVariableFilter; MAX_CHANNELS],
}

impl InputFilters {
    /// Creates the filters at their parameter defaults.
    pub fn new(sample_rate: f32) -> Self {
        let defaults = ParamSnapshot::default();
        Self {
            hpf: core::array::from_fn(|_| {
                StateVariableFilter::with_output(sample_rate, SvfOutput::Highpass, defaults.hpf_hz)
            }),
            lpf: core::array::from_fn(|_| {
                StateVariableFilter::with_output(sample_rate, SvfOutput::Lowpass, defaults.lpf_hz)
            }),
        }
    }

    /// Updates the sample rate of every filter and clears state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for f in self.hpf.iter_mut().chain(self.lpf.iter_mut()) {
            f.set_sample_rate(sample_rate);
            f.reset();
        }
    }

    /// Clears filter memory.
    pub fn reset(&mut self) {
        for f in self.hpf.iter_mut().chain(self.lpf.iter_mut()) {
            f.reset();
        }
    }

    /// Filters the active region of `buffer` in place.
    ///
    /// Returns [`StageOutcome::Fatal`] if any output sample is non-finite.
    pub fn process(&mut self, buffer: &mut ChannelBuffer, params: &ParamSnapshot) -> StageOutcome {
        let channels = buffer.channels().min(MAX_CHANNELS);
        for ch in 0..channels {
            let hpf = &mut self.hpf[ch];
            let lpf = &mut self.lpf[ch];
            hpf.set_cutoff(params.hpf_hz);
            lpf.set_cutoff(params.lpf_hz);
            let samples = buffer.channel_mut(ch);
            hpf.process_block_inplace(samples);
            lpf.process_block_inplace(samples);
        }
        if buffer.is_finite() {
            StageOutcome::Ok
        } else {
            StageOutcome::Fatal
        }
    }
}
