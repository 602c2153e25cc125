//! Factory presets bundled with drumforge.
//!
//! One starting point per drum mode plus a neutral init preset. They are
//! embedded at compile time and always available.

use crate::Preset;

/// Factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "kick_punch",
    "snare_crack",
    "tom_boom",
    "hat_tighten",
    "perc_snap",
    "bus_glue",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("kick_punch", KICK_PUNCH_PRESET),
    ("snare_crack", SNARE_CRACK_PRESET),
    ("tom_boom", TOM_BOOM_PRESET),
    ("hat_tighten", HAT_TIGHTEN_PRESET),
    ("perc_snap", PERC_SNAP_PRESET),
    ("bus_glue", BUS_GLUE_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "Table defaults, snare voicing"
mode = "Snare"
"#;

const KICK_PUNCH_PRESET: &str = r#"
name = "Kick Punch"
description = "Tight low end with a clicky front"
mode = "Kick"

[params]
attAmt = 6.0
susAmt = -3.0
compThreshold = -18.0
compRatio = 6.0
compAttack = 15.0
compRelease = 90.0
satType = 2.0
satDrive = 9.0
satMix = 0.6
bodyGain = 3.0
gateThresh = -45.0
"#;

const SNARE_CRACK_PRESET: &str = r#"
name = "Snare Crack"
description = "Bright crack, controlled ring"
mode = "Snare"

[params]
attAmt = 5.0
susAmt = -2.0
compThreshold = -16.0
compRatio = 4.0
compAttack = 8.0
satType = 1.0
satDrive = 8.0
satAsym = 0.35
tilt = 1.5
bodyGain = 2.0
gateThresh = -38.0
gateHyst = 4.0
"#;

const TOM_BOOM_PRESET: &str = r#"
name = "Tom Boom"
description = "Round toms with a longer tail"
mode = "Tom"

[params]
attAmt = 3.0
susAmt = 3.0
compThreshold = -20.0
compRatio = 3.0
compRelease = 200.0
satDrive = 5.0
tilt = -1.0
bodyGain = 4.0
gateThresh = -42.0
gateRel = 220.0
"#;

const HAT_TIGHTEN_PRESET: &str = r#"
name = "Hat Tighten"
description = "Short, clean hats with the wash pulled down"
mode = "Hat"

[params]
attAmt = 2.0
susAmt = -6.0
compThreshold = -14.0
compRatio = 2.5
compAttack = 4.0
satDrive = 3.0
satMix = 0.4
tilt = 2.0
gateThresh = -36.0
gateRel = 60.0
"#;

const PERC_SNAP_PRESET: &str = r#"
name = "Perc Snap"
description = "Snappy transients for claps and shakers"
mode = "Perc"

[params]
attAmt = 7.0
susAmt = -4.0
compRatio = 5.0
compAttack = 6.0
satType = 1.0
satDrive = 6.0
gateThresh = -40.0
"#;

const BUS_GLUE_PRESET: &str = r#"
name = "Bus Glue"
description = "Gentle bus compression and tape color, gate open"
mode = "Bus"

[params]
attAmt = 1.0
compThreshold = -10.0
compRatio = 2.0
compAttack = 30.0
compRelease = 150.0
compKnee = 10.0
compMix = 0.7
satType = 2.0
satDrive = 4.0
satMix = 0.5
gateThresh = -60.0
gateRatio = 1.0
"#;

/// All factory presets, in listing order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by internal name or display name (case-insensitive).
///
/// ```rust
/// use drumforge_config::get_factory_preset;
///
/// let preset = get_factory_preset("kick_punch").unwrap();
/// assert_eq!(preset.mode, "Kick");
/// assert!(get_factory_preset("Kick Punch").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Check if a name refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
