//! File-based preset and state workflows.

use drumforge_config::{
    ConfigError, ParamStore, Preset, factory_presets, get_factory_preset, restore_state,
    save_state,
};
use drumforge_effects::{
    BlockStatus, ChainConfig, DrumChain, DrumMode, Param, ParamSnapshot,
};
use tempfile::TempDir;

#[test]
fn preset_file_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("my_kick.toml");

    let store = ParamStore::new();
    store.set_mode(DrumMode::Kick);
    store.set(Param::AttackAmount, 8.0);
    store.set(Param::SatType, 1.0);
    let preset = Preset::from_store("My Kick", &store).with_description("saved in a test");
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);

    let other = ParamStore::new();
    loaded.apply(&other).unwrap();
    assert_eq!(other.snapshot(), store.snapshot());
}

#[test]
fn hand_written_preset_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("hand.toml");
    std::fs::write(
        &path,
        r#"
name = "Hand"
mode = "tom"

[params]
compRatio = 3.5
dryWet = 0.5
autoGain = 0.0
"#,
    )
    .unwrap();

    let snap = Preset::load(&path).unwrap().to_snapshot().unwrap();
    assert_eq!(snap.mode, DrumMode::Tom);
    assert_eq!(snap.comp_ratio, 3.5);
    assert_eq!(snap.dry_wet, 0.5);
    assert!(!snap.auto_gain);
    assert_eq!(snap.body_hz, 140.0);
}

#[test]
fn broken_preset_files_are_errors() {
    let tmp = TempDir::new().unwrap();

    let missing = Preset::load(tmp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::ReadFile { .. }));

    let bad = tmp.path().join("bad.toml");
    std::fs::write(&bad, "name = [unclosed").unwrap();
    assert!(matches!(
        Preset::load(&bad).unwrap_err(),
        ConfigError::TomlParse(_)
    ));
}

#[test]
fn state_blob_survives_a_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("session.state");

    let store = ParamStore::new();
    get_factory_preset("bus_glue").unwrap().apply(&store).unwrap();
    store.set(Param::OutputTrim, -2.25);
    std::fs::write(&path, save_state(&store).unwrap()).unwrap();

    let restored = ParamStore::new();
    assert!(restore_state(&restored, &std::fs::read(&path).unwrap()));
    assert_eq!(restored.values(), store.values());
}

#[test]
fn truncated_state_file_is_ignored() {
    let store = ParamStore::new();
    store.set(Param::Tilt, 2.0);
    let blob = save_state(&store).unwrap();

    let target = ParamStore::new();
    target.set(Param::Tilt, -4.0);
    assert!(!restore_state(&target, &blob[..blob.len() / 2]));
    assert_eq!(target.get(Param::Tilt), -4.0);
}

#[test]
fn every_factory_preset_runs_through_the_chain() {
    for preset in factory_presets() {
        let store = ParamStore::new();
        preset.apply(&store).unwrap();
        let params = store.snapshot();

        let mut chain = DrumChain::new();
        chain
            .prepare(ChainConfig::new(48000.0, 256, 2), &params)
            .unwrap();
        let mut left: Vec<f32> = (0..1024)
            .map(|i| (i as f32 * 0.05).sin() * (-(i as f32) / 300.0).exp())
            .collect();
        let mut right = left.clone();
        let status = chain.process_block(&mut [&mut left[..], &mut right[..]], &params);
        assert_eq!(status, BlockStatus::Processed, "{}", preset.name);
        assert!(left.iter().chain(&right).all(|s| s.is_finite()));
    }
}

#[test]
fn store_snapshot_feeds_audio_thread() {
    let store = ParamStore::new();
    let audio = store.clone();
    let handle = std::thread::spawn(move || {
        let mut seen = ParamSnapshot::default();
        for _ in 0..1000 {
            seen = audio.snapshot();
            if seen.sat_drive_db == 20.0 {
                break;
            }
            std::thread::yield_now();
        }
        seen
    });
    store.set(Param::SatDrive, 20.0);
    let seen = handle.join().unwrap();
    // Whatever the interleaving, every read is a valid snapshot
    assert_eq!(seen, seen.clamped());
}
