//! The drum chain orchestrator.
//!
//! [`DrumChain`] owns every stage and the scratch buffers, and runs one block
//! through them:
//!
//! ```text
//! input trim → dry copy → HPF/LPF → transient → compressor → saturator
//!            → tilt/body → gate → clip/limiter → dry/wet → auto-gain + output trim
//! ```
//!
//! The dry copy runs through a delay of [`DrumChain::latency_samples`], so
//! the dry path, the processed path and the dry fallback all share the
//! latency reported to the host.
//!
//! # Real-time contract
//!
//! [`DrumChain::prepare`] allocates and may log; call it with the audio thread
//! quiesced. [`DrumChain::process_block`] never allocates, locks, logs or
//! panics. It reads the parameter snapshot once and reports what happened as
//! a [`BlockStatus`].
//!
//! # Failure handling
//!
//! | Where | Result |
//! |-------|--------|
//! | Degenerate block (no channels, no samples, ragged, too wide, not prepared) | block cleared, [`BlockStatus::Rejected`] |
//! | Input filters produce non-finite samples | block zeroed, [`BlockStatus::Silenced`] |
//! | Optional stage fatal, or non-finite after the limiter | dry copy restored, [`BlockStatus::DryFallback`] |
//! | An optional stage fell back to neutral | [`BlockStatus::Degraded`] |
//!
//! Blocks longer than the prepared block size are processed in chunks; see
//! [`DrumChain::process_block`].

use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::collections::TryReserveError;
#[cfg(feature = "std")]
use std::collections::TryReserveError;

use drumforge_core::{
    ChannelBuffer, FixedDelayLine, MAX_BLOCK_SIZE, OversampleFactor, db_to_linear, wet_dry_mix,
};

use crate::compressor::DrumCompressor;
use crate::filters::InputFilters;
use crate::gate::Gate;
use crate::limiter::ClipLimiter;
use crate::params::ParamSnapshot;
use crate::saturator::Saturator;
use crate::stage::StageOutcome;
use crate::tone::ToneShaper;
use crate::transient::TransientShaper;

/// Widest supported I/O layout (stereo).
pub const MAX_IO_CHANNELS: usize = 2;

/// Auto-gain estimate bound in dB.
pub const AUTO_GAIN_LIMIT_DB: f32 = 12.0;

/// Dry-path delay capacity; covers every oversampler latency.
const DRY_DELAY_CAPACITY: usize = 8;

/// Configuration-time error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    /// Channel count other than mono or stereo.
    UnsupportedLayout(usize),
    /// Maximum block size of zero.
    InvalidBlockSize(usize),
    /// Sample rate that is not positive and finite.
    InvalidSampleRate,
    /// Scratch storage could not be reserved.
    Allocation(TryReserveError),
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLayout(n) => {
                write!(f, "unsupported layout: {n} channels (expected mono or stereo)")
            }
            Self::InvalidBlockSize(n) => write!(f, "invalid maximum block size {n}"),
            Self::InvalidSampleRate => write!(f, "sample rate must be positive and finite"),
            Self::Allocation(err) => write!(f, "scratch allocation failed: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PrepareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Allocation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TryReserveError> for PrepareError {
    fn from(err: TryReserveError) -> Self {
        Self::Allocation(err)
    }
}

/// Stream configuration handed to [`DrumChain::prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will send without chunking.
    pub max_block_size: usize,
    /// Channel count; input and output layouts are equal.
    pub channels: usize,
}

impl ChainConfig {
    /// Creates a configuration.
    pub fn new(sample_rate: f32, max_block_size: usize, channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            channels,
        }
    }

    /// Checks the configuration, returning a copy with the block size
    /// clamped to [`MAX_BLOCK_SIZE`].
    pub fn validate(&self) -> Result<Self, PrepareError> {
        if !(1..=MAX_IO_CHANNELS).contains(&self.channels) {
            return Err(PrepareError::UnsupportedLayout(self.channels));
        }
        if self.max_block_size == 0 {
            return Err(PrepareError::InvalidBlockSize(self.max_block_size));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(PrepareError::InvalidSampleRate);
        }
        Ok(Self {
            max_block_size: self.max_block_size.min(MAX_BLOCK_SIZE),
            ..*self
        })
    }
}

/// What [`DrumChain::prepare`] ended up with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepareReport {
    /// The validated configuration in effect.
    pub config: ChainConfig,
    /// Oversampling factor actually in use.
    pub oversampling: OversampleFactor,
    /// Processing latency in samples.
    pub latency_samples: usize,
    /// True if the requested oversampling could not be built.
    pub degraded: bool,
}

/// Outcome of one [`DrumChain::process_block`] call, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BlockStatus {
    /// Every stage ran normally.
    #[default]
    Processed,
    /// At least one optional stage ran neutral for this block.
    Degraded,
    /// The optional stages were discarded and the dry copy used instead.
    DryFallback,
    /// The mandatory filters failed; the block was zeroed.
    Silenced,
    /// The block was not processed and was cleared.
    Rejected,
}

/// Auto-gain compensation in dB for `params` (0 when disabled).
///
/// A fixed linear estimate of the level added by the processing:
/// `-(0.35·attack + 0.25·sustain + 0.3·max(0, drive - 6) + 2·comp_mix)`,
/// clamped to ±[`AUTO_GAIN_LIMIT_DB`].
pub fn auto_gain_db(params: &ParamSnapshot) -> f32 {
    if !params.auto_gain {
        return 0.0;
    }
    let estimate = -(0.35 * params.attack_amount_db
        + 0.25 * params.sustain_amount_db
        + 0.3 * (params.sat_drive_db - 6.0).max(0.0)
        + 2.0 * params.comp_mix);
    estimate.clamp(-AUTO_GAIN_LIMIT_DB, AUTO_GAIN_LIMIT_DB)
}

/// Total output gain in dB: output trim plus auto-gain.
pub fn output_gain_db(params: &ParamSnapshot) -> f32 {
    params.output_trim_db + auto_gain_db(params)
}

/// The complete drum-shaping chain.
///
/// # Example
///
/// ```rust
/// use drumforge_effects::{BlockStatus, ChainConfig, DrumChain, ParamSnapshot};
///
/// let params = ParamSnapshot::default();
/// let mut chain = DrumChain::new();
/// chain.prepare(ChainConfig::new(48000.0, 512, 2), &params).unwrap();
///
/// let mut left = vec![0.0_f32; 512];
/// let mut right = vec![0.0_f32; 512];
/// let status = chain.process_block(&mut [&mut left[..], &mut right[..]], &params);
/// assert_eq!(status, BlockStatus::Processed);
/// assert!(left.iter().all(|&s| s == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct DrumChain {
    config: Option<ChainConfig>,
    active_channels: usize,

    work: ChannelBuffer,
    dry: ChannelBuffer,
    stage_dry: ChannelBuffer,
    dry_delay: [FixedDelayLine<DRY_DELAY_CAPACITY>; MAX_IO_CHANNELS],

    filters: InputFilters,
    transient: TransientShaper,
    compressor: DrumCompressor,
    saturator: Saturator,
    tone: ToneShaper,
    gate: Gate,
    limiter: ClipLimiter,
}

impl Default for DrumChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DrumChain {
    /// Creates an unprepared chain. Every block is rejected until
    /// [`prepare`](Self::prepare) succeeds.
    pub fn new() -> Self {
        let sr = 48000.0;
        Self {
            config: None,
            active_channels: 0,
            work: ChannelBuffer::new(),
            dry: ChannelBuffer::new(),
            stage_dry: ChannelBuffer::new(),
            dry_delay: core::array::from_fn(|_| FixedDelayLine::new()),
            filters: InputFilters::new(sr),
            transient: TransientShaper::new(sr),
            compressor: DrumCompressor::new(sr),
            saturator: Saturator::new(),
            tone: ToneShaper::new(sr),
            gate: Gate::new(sr),
            limiter: ClipLimiter::new(sr),
        }
    }

    /// Configures the chain for a stream. Not real-time safe.
    ///
    /// Resets every stage, sizes the scratch buffers and rebuilds the
    /// oversampler when its factor or channel count changed. A failed
    /// oversampler build falls back to 1× and is flagged in the report.
    pub fn prepare(
        &mut self,
        config: ChainConfig,
        params: &ParamSnapshot,
    ) -> Result<PrepareReport, PrepareError> {
        let config = match config.validate() {
            Ok(config) => config,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%err, "chain configuration rejected");
                return Err(err);
            }
        };
        let params = params.clamped();
        self.config = None;

        self.work.try_allocate(config.channels, config.max_block_size)?;
        self.dry.try_allocate(config.channels, config.max_block_size)?;
        self.stage_dry
            .try_allocate(config.channels, config.max_block_size)?;

        let sr = config.sample_rate;
        self.filters.set_sample_rate(sr);
        self.transient.set_sample_rate(sr);
        self.compressor.set_sample_rate(sr);
        self.tone.set_sample_rate(sr);
        self.gate.set_sample_rate(sr);
        self.limiter.set_sample_rate(sr);

        let degraded = match self.saturator.prepare(params.oversampling, config.channels) {
            Ok(()) => false,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(err = %_err, "oversampler allocation failed, running at 1x");
                true
            }
        };

        let latency = self.latency_samples();
        for delay in &mut self.dry_delay {
            delay.set_delay(latency);
        }

        self.active_channels = config.channels;
        self.config = Some(config);

        let report = PrepareReport {
            config,
            oversampling: self.saturator.factor().unwrap_or(OversampleFactor::X1),
            latency_samples: self.latency_samples(),
            degraded,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = config.sample_rate,
            block = config.max_block_size,
            channels = config.channels,
            oversampling = report.oversampling.ratio(),
            latency = report.latency_samples,
            "chain prepared"
        );
        Ok(report)
    }

    /// Drops scratch storage and the oversampler and resets every stage.
    /// The chain rejects blocks until prepared again.
    pub fn release(&mut self) {
        self.config = None;
        self.active_channels = 0;
        self.work.release();
        self.dry.release();
        self.stage_dry.release();
        self.saturator.release();
        for delay in &mut self.dry_delay {
            delay.set_delay(0);
        }
        self.reset();
    }

    /// Clears every stage's state without touching the configuration.
    pub fn reset(&mut self) {
        self.filters.reset();
        for delay in &mut self.dry_delay {
            delay.clear();
        }
        self.reset_optional();
    }

    fn reset_optional(&mut self) {
        self.transient.reset();
        self.compressor.reset();
        self.saturator.reset();
        self.tone.reset();
        self.gate.reset();
    }

    /// The configuration in effect, if prepared.
    pub fn config(&self) -> Option<ChainConfig> {
        self.config
    }

    /// Whether [`prepare`](Self::prepare) has succeeded since the last release.
    pub fn is_prepared(&self) -> bool {
        self.config.is_some()
    }

    /// Processing latency in samples (oversampler group delay at base rate).
    /// Every output path, dry included, is delayed by this amount.
    pub fn latency_samples(&self) -> usize {
        self.saturator.latency_samples()
    }

    /// Whether `params` asks for settings that only take effect on the next
    /// [`prepare`](Self::prepare) (currently the oversampling factor).
    pub fn needs_rebuild(&self, params: &ParamSnapshot) -> bool {
        self.saturator.factor() != Some(params.clamped().oversampling)
    }

    /// Processes one block in place. Real-time safe.
    ///
    /// `io` holds one slice per channel, all of equal length. A block longer
    /// than the prepared `max_block_size` is processed as consecutive chunks
    /// of that size, each exactly as if it were its own block. In particular
    /// the limiter's look-ahead stops at the end of each chunk and does not
    /// see the samples of the next one.
    pub fn process_block(&mut self, io: &mut [&mut [f32]], params: &ParamSnapshot) -> BlockStatus {
        let Some(config) = self.config else {
            clear(io);
            return BlockStatus::Rejected;
        };
        let channels = io.len();
        let len = io.first().map_or(0, |ch| ch.len());
        if channels == 0
            || len == 0
            || channels > config.channels
            || io.iter().any(|ch| ch.len() != len)
        {
            clear(io);
            return BlockStatus::Rejected;
        }

        let params = params.clamped();
        if channels != self.active_channels {
            self.reset();
            self.active_channels = channels;
        }

        let chunk = self.work.capacity();
        let mut status = BlockStatus::Processed;
        for start in (0..len).step_by(chunk) {
            let end = (start + chunk).min(len);
            status = status.max(self.process_chunk(io, start, end, &params));
        }
        status
    }

    fn process_chunk(
        &mut self,
        io: &mut [&mut [f32]],
        start: usize,
        end: usize,
        p: &ParamSnapshot,
    ) -> BlockStatus {
        let channels = io.len();
        if !self.work.set_shape(channels, end - start) {
            for ch in io.iter_mut() {
                ch[start..end].fill(0.0);
            }
            return BlockStatus::Rejected;
        }

        let trim = db_to_linear(p.input_trim_db);
        for (ch, input) in io.iter().enumerate() {
            let work = self.work.channel_mut(ch);
            work.copy_from_slice(&input[start..end]);
            if trim != 1.0 {
                for s in work.iter_mut() {
                    *s *= trim;
                }
            }
        }
        self.dry.copy_from(&self.work);
        for (ch, delay) in self.dry_delay.iter_mut().enumerate().take(channels) {
            delay.process_slice(self.dry.channel_mut(ch));
        }

        if self.filters.process(&mut self.work, p).is_fatal() {
            self.filters.reset();
            for ch in io.iter_mut() {
                ch[start..end].fill(0.0);
            }
            return BlockStatus::Silenced;
        }

        let outcome = self.run_optional(p);
        let mut status = match outcome {
            StageOutcome::Ok => BlockStatus::Processed,
            StageOutcome::Degraded => BlockStatus::Degraded,
            StageOutcome::Fatal => BlockStatus::DryFallback,
        };
        if outcome.is_fatal() || !self.work.is_finite() {
            self.work.copy_from(&self.dry);
            self.reset_optional();
            status = BlockStatus::DryFallback;
        }

        if p.dry_wet < 1.0 {
            for ch in 0..channels {
                let dry = self.dry.channel(ch);
                for (wet, &d) in self.work.channel_mut(ch).iter_mut().zip(dry) {
                    *wet = wet_dry_mix(d, *wet, p.dry_wet);
                }
            }
        }

        let out_db = output_gain_db(p);
        if out_db != 0.0 {
            self.work.apply_gain(db_to_linear(out_db));
        }

        for (ch, output) in io.iter_mut().enumerate() {
            output[start..end].copy_from_slice(self.work.channel(ch));
        }
        status
    }

    fn run_optional(&mut self, p: &ParamSnapshot) -> StageOutcome {
        let mut outcome = self.transient.process(&mut self.work, p);
        if outcome.is_fatal() {
            return outcome;
        }
        outcome = outcome.worst(self.compressor.process(&mut self.work, &mut self.stage_dry, p));
        if outcome.is_fatal() {
            return outcome;
        }
        outcome = outcome.worst(self.saturator.process(&mut self.work, &mut self.stage_dry, p));
        if outcome.is_fatal() {
            return outcome;
        }
        outcome = outcome.worst(self.tone.process(&mut self.work, p));
        if outcome.is_fatal() {
            return outcome;
        }
        outcome = outcome.worst(self.gate.process(&mut self.work, p));
        if outcome.is_fatal() {
            return outcome;
        }
        outcome.worst(self.limiter.process(&mut self.work, p))
    }
}

fn clear(io: &mut [&mut [f32]]) {
    for ch in io.iter_mut() {
        ch.fill(0.0);
    }
}
