//! Criterion benchmarks for the drum chain
//!
//! Run with: cargo bench -p drumforge-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drumforge_effects::{ChainConfig, DrumChain, OversampleFactor, Param, ParamSnapshot};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 180.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_chain_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("DrumChain/stereo");
    let params = ParamSnapshot::default();

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &block_size| {
                let mut chain = DrumChain::new();
                chain
                    .prepare(ChainConfig::new(SAMPLE_RATE, block_size, 2), &params)
                    .unwrap();
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    black_box(chain.process_block(&mut [&mut left[..], &mut right[..]], &params))
                });
            },
        );
    }

    group.finish();
}

fn bench_oversampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("DrumChain/oversampling_512");
    let input = generate_test_signal(512);

    for factor in [OversampleFactor::X1, OversampleFactor::X2, OversampleFactor::X4] {
        let params = ParamSnapshot::default()
            .with_value(Param::Oversampling, factor.index() as f32)
            .with_value(Param::SatDrive, 18.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(factor.ratio()),
            &params,
            |b, params| {
                let mut chain = DrumChain::new();
                chain
                    .prepare(ChainConfig::new(SAMPLE_RATE, 512, 2), params)
                    .unwrap();
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    black_box(chain.process_block(&mut [&mut left[..], &mut right[..]], params))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_chain_block_sizes, bench_oversampling);
criterion_main!(benches);
