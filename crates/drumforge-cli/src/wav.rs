//! WAV file reading and writing.

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Planar audio loaded from or written to a WAV file.
#[derive(Debug, Clone)]
pub struct Audio {
    /// One buffer per channel, all the same length.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Audio {
    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Peak absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// RMS across all channels.
    pub fn rms(&self) -> f32 {
        let count: usize = self.channels.iter().map(Vec::len).sum();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .channels
            .iter()
            .flatten()
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        (sum / count as f64).sqrt() as f32
    }
}

/// Read a WAV file into planar `f32` channels.
///
/// Integer formats are scaled to `[-1, 1)`.
pub fn read_wav(path: &Path) -> anyhow::Result<Audio> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels);

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channel_count.max(1);
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(Audio {
        channels,
        sample_rate: spec.sample_rate,
    })
}

/// Write planar channels to a WAV file.
///
/// 32-bit output is IEEE float; 16 and 24 are integer PCM, clamped.
pub fn write_wav(path: &Path, audio: &Audio, bits_per_sample: u16) -> anyhow::Result<()> {
    if !matches!(bits_per_sample, 16 | 24 | 32) {
        anyhow::bail!("unsupported bit depth {bits_per_sample} (expected 16, 24, or 32)");
    }

    let spec = hound::WavSpec {
        channels: u16::try_from(audio.channels.len())?,
        sample_rate: audio.sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let max_val = (1i32 << (bits_per_sample - 1)) as f32;
    for i in 0..audio.frames() {
        for channel in &audio.channels {
            let sample = channel[i];
            if bits_per_sample == 32 {
                writer.write_sample(sample)?;
            } else {
                writer.write_sample((sample * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
