//! Integration tests for the drumforge binary.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn drumforge_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_drumforge"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write_hit(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let s = (2.0 * std::f32::consts::PI * 120.0 * t).sin() * (-t * 30.0).exp() * 0.8;
        for _ in 0..channels {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_all(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<f32>().map(Result::unwrap).collect();
    (spec, samples)
}

#[test]
fn params_lists_every_key() {
    let output = drumforge_bin().arg("params").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for key in ["inputTrim", "compKnee", "osFactor", "autoGain", "outputTrim"] {
        assert!(stdout.contains(key), "missing {key}");
    }
}

#[test]
fn params_json_is_parseable() {
    let output = drumforge_bin()
        .args(["params", "--json", "--mode", "kick"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 32);
    let hpf = entries.iter().find(|e| e["string_id"] == "hpfHz").unwrap();
    assert_eq!(hpf["default"], 25.0);
}

#[test]
fn render_stereo_keeps_layout_and_length() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in.wav");
    let output = tmp.path().join("out.wav");
    write_hit(&input, 2, 48000, 6000);

    let status = drumforge_bin()
        .arg("render")
        .arg(&input)
        .arg(&output)
        .args(["--preset", "snare_crack", "--param", "satType=Tape", "--quiet"])
        .status()
        .unwrap();
    assert!(status.success());

    let (spec, samples) = read_all(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(samples.len(), 12000);
    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(samples.iter().any(|&s| s != 0.0));
}

#[test]
fn render_dry_reproduces_input() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in.wav");
    let output = tmp.path().join("out.wav");
    write_hit(&input, 1, 44100, 3000);

    let status = drumforge_bin()
        .arg("render")
        .arg(&input)
        .arg(&output)
        .args(["--param", "dryWet=0", "--param", "autoGain=off"])
        .args(["--compensate-latency", "-q"])
        .status()
        .unwrap();
    assert!(status.success());

    let (_, original) = read_all(&input);
    let (_, rendered) = read_all(&output);
    assert_eq!(original, rendered);
}

#[test]
fn render_rejects_more_than_two_channels() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("quad.wav");
    write_hit(&input, 4, 48000, 100);

    let output = drumforge_bin()
        .arg("render")
        .arg(&input)
        .arg(tmp.path().join("out.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mono and stereo"));
}

#[test]
fn render_rejects_unknown_param() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in.wav");
    write_hit(&input, 1, 48000, 100);

    let output = drumforge_bin()
        .arg("render")
        .arg(&input)
        .arg(tmp.path().join("out.wav"))
        .args(["--param", "wobble=3"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("wobble"));
}

#[test]
fn preset_save_then_render_with_it() {
    let tmp = TempDir::new().unwrap();
    let preset_path = tmp.path().join("mine.toml");

    let status = drumforge_bin()
        .args(["preset", "save", "mine", "--mode", "tom", "--param", "compRatio=7"])
        .arg("--output")
        .arg(&preset_path)
        .status()
        .unwrap();
    assert!(status.success());
    let text = std::fs::read_to_string(&preset_path).unwrap();
    assert!(text.contains("mode = \"Tom\""));
    assert!(text.contains("compRatio = 7.0"));

    // Refuses to overwrite without --force
    let status = drumforge_bin()
        .args(["preset", "save", "mine"])
        .arg("--output")
        .arg(&preset_path)
        .status()
        .unwrap();
    assert!(!status.success());

    let output = drumforge_bin()
        .args(["preset", "show"])
        .arg(&preset_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("compRatio      7:1*"), "{stdout}");
}

#[test]
fn state_save_and_show() {
    let tmp = TempDir::new().unwrap();
    let state = tmp.path().join("session.state");

    let status = drumforge_bin()
        .args(["state", "save"])
        .arg(&state)
        .args(["--preset", "kick_punch", "--param", "outputTrim=-3"])
        .status()
        .unwrap();
    assert!(status.success());

    let output = drumforge_bin()
        .args(["state", "show"])
        .arg(&state)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l.starts_with("outputTrim") && l.ends_with("-3")));
    assert!(stdout.lines().any(|l| l.starts_with("mode") && l.ends_with(" 0")));
}

#[test]
fn state_show_rejects_garbage() {
    let tmp = TempDir::new().unwrap();
    let state = tmp.path().join("bad.state");
    std::fs::write(&state, b"\x00\x01garbage").unwrap();

    let output = drumforge_bin()
        .args(["state", "show"])
        .arg(&state)
        .output()
        .unwrap();
    assert!(!output.status.success());
}
