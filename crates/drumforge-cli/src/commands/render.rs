//! Offline rendering of a WAV file through the drum chain.

use super::common::ParamSource;
use crate::wav::{Audio, read_wav, write_wav};
use clap::Args;
use drumforge_core::linear_to_db;
use drumforge_effects::{BlockStatus, ChainConfig, DrumChain, MAX_IO_CHANNELS};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    source: ParamSource,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Shift the output earlier by the oversampler latency
    #[arg(long)]
    compensate_latency: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

/// Per-status block counts for one render.
#[derive(Debug, Default)]
struct StatusCounts {
    processed: usize,
    degraded: usize,
    dry_fallback: usize,
    silenced: usize,
    rejected: usize,
}

impl StatusCounts {
    fn record(&mut self, status: BlockStatus) {
        match status {
            BlockStatus::Processed => self.processed += 1,
            BlockStatus::Degraded => self.degraded += 1,
            BlockStatus::DryFallback => self.dry_fallback += 1,
            BlockStatus::Silenced => self.silenced += 1,
            BlockStatus::Rejected => self.rejected += 1,
        }
    }

    fn total(&self) -> usize {
        self.processed + self.degraded + self.dry_fallback + self.silenced + self.rejected
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let input = read_wav(&args.input)?;
    let channel_count = input.channels.len();
    if channel_count == 0 || channel_count > MAX_IO_CHANNELS {
        anyhow::bail!(
            "{} has {} channels; only mono and stereo are supported",
            args.input.display(),
            channel_count
        );
    }

    let store = args.source.build_store()?;
    let params = store.snapshot();

    let mut chain = DrumChain::new();
    let report = chain.prepare(
        ChainConfig::new(input.sample_rate as f32, args.block_size, channel_count),
        &params,
    )?;
    tracing::info!(
        input = %args.input.display(),
        sample_rate = input.sample_rate,
        channels = channel_count,
        frames = input.frames(),
        mode = params.mode.label(),
        oversampling = report.oversampling.ratio(),
        latency = report.latency_samples,
        "rendering"
    );
    if report.degraded {
        tracing::warn!("oversampler unavailable, saturating at base rate");
    }

    let latency = if args.compensate_latency {
        report.latency_samples
    } else {
        0
    };
    let total = input.frames() + latency;
    let mut work: Vec<Vec<f32>> = input
        .channels
        .iter()
        .map(|ch| {
            let mut padded = ch.clone();
            padded.resize(total, 0.0);
            padded
        })
        .collect();

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let block_size = report.config.max_block_size;
    let mut counts = StatusCounts::default();
    let mut start = 0;
    while start < total {
        let end = (start + block_size).min(total);
        let mut blocks: Vec<&mut [f32]> =
            work.iter_mut().map(|ch| &mut ch[start..end]).collect();
        counts.record(chain.process_block(&mut blocks, &params));
        pb.set_position(end as u64);
        start = end;
    }
    pb.finish_and_clear();

    let output = Audio {
        channels: work.into_iter().map(|ch| ch[latency..].to_vec()).collect(),
        sample_rate: input.sample_rate,
    };

    if counts.processed != counts.total() {
        tracing::warn!(?counts, "some blocks were not fully processed");
    }
    tracing::info!(
        input_peak_db = linear_to_db(input.peak()),
        output_peak_db = linear_to_db(output.peak()),
        input_rms_db = linear_to_db(input.rms()),
        output_rms_db = linear_to_db(output.rms()),
        blocks = counts.total(),
        "render finished"
    );

    write_wav(&args.output, &output, args.bit_depth)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

