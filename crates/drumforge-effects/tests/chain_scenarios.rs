//! End-to-end scenarios for the drum chain.

use drumforge_core::{OversampleFactor, cubic_soft_clip, db_to_linear};
use drumforge_effects::{
    BlockStatus, ChainConfig, DrumChain, DrumMode, Param, ParamSnapshot, apply_mode,
    limit_channel, lookahead_samples, mode_nudges,
};

const SAMPLE_RATE: f32 = 48000.0;

/// Decaying noise-like burst resembling a drum hit.
fn drum_hit(len: usize) -> Vec<f32> {
    let mut seed = 0x1234_5678_u32;
    (0..len)
        .map(|i| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (seed >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0;
            let body = (2.0 * std::f32::consts::PI * 180.0 * i as f32 / SAMPLE_RATE).sin();
            let decay = (-(i as f32) / (0.05 * SAMPLE_RATE)).exp();
            0.8 * decay * (0.6 * body + 0.4 * noise)
        })
        .collect()
}

#[test]
fn test_silence_in_silence_out() {
    let params = ParamSnapshot::default();
    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 512, 2), &params)
        .unwrap();

    for _ in 0..20 {
        let mut left = vec![0.0_f32; 512];
        let mut right = vec![0.0_f32; 512];
        let status = chain.process_block(&mut [&mut left[..], &mut right[..]], &params);
        assert_eq!(status, BlockStatus::Processed);
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }
}

#[test]
fn test_every_mode_and_curve_processes_a_hit() {
    for mode in DrumMode::ALL {
        for sat_type in 0..3 {
            for os in 0..3 {
                let params = apply_mode(mode, &ParamSnapshot::default())
                    .with_value(Param::SatType, sat_type as f32)
                    .with_value(Param::Oversampling, os as f32)
                    .with_value(Param::SatDrive, 18.0);
                let mut chain = DrumChain::new();
                let report = chain
                    .prepare(ChainConfig::new(SAMPLE_RATE, 256, 1), &params)
                    .unwrap();
                assert_eq!(report.oversampling, OversampleFactor::from_index(os));

                let mut hit = drum_hit(4096);
                let status = chain.process_block(&mut [&mut hit[..]], &params);
                assert_eq!(status, BlockStatus::Processed, "{mode:?}/{sat_type}/{os}");
                assert!(hit.iter().all(|s| s.is_finite()));
                assert!(hit.iter().any(|&s| s != 0.0));
            }
        }
    }
}

#[test]
fn test_lookahead_impulse_pre_reduces() {
    let params = ParamSnapshot::default();
    let look = lookahead_samples(params.lookahead_ms, SAMPLE_RATE);
    assert_eq!(look, 24);

    let ceiling = db_to_linear(params.clip_ceiling_db);
    let impulse = 4.0;
    let mut x = vec![0.0_f32; 256];
    x[100] = 0.05;
    x[100 + look] = impulse;
    limit_channel(&mut x, ceiling, look);

    let pre_gain = ceiling / impulse;
    assert!((x[100] - cubic_soft_clip(0.05 * pre_gain / ceiling) * ceiling).abs() < 1e-9);
    assert!((x[100] / 0.05 - pre_gain).abs() < 1e-3);
    // One sample earlier the impulse is out of reach
    assert_eq!(x[99], 0.0);
}

#[test]
fn test_dry_wet_zero_returns_trimmed_input() {
    let params = ParamSnapshot {
        input_trim_db: -6.0,
        dry_wet: 0.0,
        auto_gain: false,
        output_trim_db: 0.0,
        ..ParamSnapshot::default()
    };
    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 128, 1), &params)
        .unwrap();

    let input = drum_hit(1024);
    let mut out = input.clone();
    chain.process_block(&mut [&mut out[..]], &params);
    let trim = db_to_linear(-6.0);
    let latency = chain.latency_samples();
    assert_eq!(latency, 4);
    assert!(out[..latency].iter().all(|&s| s == 0.0));
    for (o, x) in out[latency..].iter().zip(&input) {
        assert_eq!(*o, x * trim);
    }
}

/// RMS gain of the chain for a steady 0.1-amplitude sine, measured over the
/// second half of a 9600-sample render.
fn sine_gain(params: &ParamSnapshot, freq: f32) -> f32 {
    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 480, 1), params)
        .unwrap();
    let input: Vec<f32> = (0..9600)
        .map(|i| 0.1 * (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE).sin())
        .collect();
    let mut out = input.clone();
    for block in out.chunks_mut(480) {
        assert_eq!(chain.process_block(&mut [block], params), BlockStatus::Processed);
    }
    let rms = |x: &[f32]| (x.iter().map(|s| s * s).sum::<f32>() / x.len() as f32).sqrt();
    rms(&out[4800..]) / rms(&input[4800..])
}

#[test]
fn test_half_wet_response_is_flat_when_oversampling() {
    // Near-linear settings so dry and wet differ only by the oversampler
    let base = ParamSnapshot {
        attack_amount_db: 0.0,
        sustain_amount_db: 0.0,
        comp_mix: 0.0,
        sat_drive_db: 0.0,
        sat_mix: 0.05,
        auto_gain: false,
        output_trim_db: 0.0,
        dry_wet: 0.5,
        ..ParamSnapshot::default()
    };
    for os in [OversampleFactor::X2, OversampleFactor::X4] {
        let params = ParamSnapshot {
            oversampling: os,
            ..base
        };
        let full_wet = ParamSnapshot {
            dry_wet: 1.0,
            ..params
        };
        for freq in [1000.0, 3000.0, 6857.0] {
            let half = sine_gain(&params, freq);
            let wet = sine_gain(&full_wet, freq);
            // In phase: the blend sits halfway between dry (1) and wet
            let expected = 0.5 * (1.0 + wet);
            assert!(half > 0.8, "{os:?} at {freq} Hz: gain {half}");
            assert!(
                (half - expected).abs() < 0.03,
                "{os:?} at {freq} Hz: gain {half}, expected about {expected}"
            );
        }
    }
}

#[test]
fn test_long_block_matches_consecutive_blocks() {
    let params = ParamSnapshot::default();
    let input = drum_hit(2048);

    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 256, 1), &params)
        .unwrap();
    let mut whole = input.clone();
    chain.process_block(&mut [&mut whole[..]], &params);

    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 256, 1), &params)
        .unwrap();
    let mut pieces = input;
    for block in pieces.chunks_mut(256) {
        chain.process_block(&mut [block], &params);
    }

    // Each chunk is its own block, look-ahead included
    assert_eq!(whole, pieces);
}

#[test]
fn test_low_sample_rate_degrades_tone_stage() {
    // The 650 Hz tilt pivot is above Nyquist at 1 kHz
    let params = ParamSnapshot {
        sidechain_hpf_hz: 90.0,
        body_hz: 100.0,
        ..ParamSnapshot::default()
    };
    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(1000.0, 64, 1), &params)
        .unwrap();
    let mut x: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin() * 0.3).collect();
    assert_eq!(
        chain.process_block(&mut [&mut x[..]], &params),
        BlockStatus::Degraded
    );
    assert!(x.iter().all(|s| s.is_finite()));
}

#[test]
fn test_overflowing_input_is_contained() {
    let params = ParamSnapshot::default();
    let mut chain = DrumChain::new();
    chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 64, 1), &params)
        .unwrap();
    let mut x = vec![f32::MAX; 64];
    let status = chain.process_block(&mut [&mut x[..]], &params);
    assert_ne!(status, BlockStatus::Rejected);
    assert!(x.iter().all(|s| s.is_finite()));
}

#[test]
fn test_oversampling_change_applies_on_prepare() {
    let params = ParamSnapshot::default();
    let mut chain = DrumChain::new();
    let report = chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 256, 2), &params)
        .unwrap();
    assert_eq!(report.oversampling, OversampleFactor::X2);
    assert_eq!(report.latency_samples, 4);

    let x4 = params.with_value(Param::Oversampling, 2.0);
    assert!(chain.needs_rebuild(&x4));
    let report = chain
        .prepare(ChainConfig::new(SAMPLE_RATE, 256, 2), &x4)
        .unwrap();
    assert_eq!(report.oversampling, OversampleFactor::X4);
    assert_eq!(chain.latency_samples(), 2);
    assert!(!report.degraded);
}

#[test]
fn test_kick_to_snare_nudges_only_untouched_params() {
    let defaults = DrumMode::Kick.defaults();
    let kick = ParamSnapshot {
        mode: DrumMode::Kick,
        hpf_hz: defaults.hpf_hz,
        sidechain_hpf_hz: defaults.sc_hpf_hz,
        body_hz: defaults.body_hz,
        ..ParamSnapshot::default()
    };
    let moved = kick.with_value(Param::BodyHz, 300.0);

    let nudged: Vec<Param> = mode_nudges(DrumMode::Snare, &moved)
        .map(|n| n.param)
        .collect();
    assert!(!nudged.contains(&Param::BodyHz));

    let snare = apply_mode(DrumMode::Snare, &moved);
    assert_eq!(snare.mode, DrumMode::Snare);
    assert_eq!(snare.body_hz, 300.0);
    assert_eq!(snare.sidechain_hpf_hz, 120.0);
    assert_eq!(snare.hpf_hz, 70.0);
    // Parameters without mode defaults are untouched
    assert_eq!(snare.comp_ratio, kick.comp_ratio);
}
