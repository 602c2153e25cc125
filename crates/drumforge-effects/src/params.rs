//! Parameter table and the per-block parameter snapshot.
//!
//! Every host-visible parameter is one entry of [`DESCRIPTORS`], addressed by
//! the [`Param`] enum. Numeric ids ([`ParamDescriptor::id`]) key saved state;
//! string ids key presets. Neither may change once released.
//!
//! The chain never reads the store directly. A control-side store produces a
//! [`ParamSnapshot`] once per block and passes it into
//! [`DrumChain::process_block`](crate::DrumChain::process_block).
//!
//! ## Parameter Table
//!
//! | Id | String id | Range | Default | Skew |
//! |----|-----------|-------|---------|------|
//! | 100 | `inputTrim` | -24–24 dB | 0 | |
//! | 101 | `mode` | Kick/Snare/Tom/Hat/Perc/Bus | Snare | |
//! | 102 | `hpfHz` | 10–400 Hz | 30 | 0.25 |
//! | 103 | `lpfHz` | 2000–22000 Hz | 20000 | 0.3 |
//! | 104 | `attAmt` | -12–12 dB | 2 | |
//! | 105 | `susAmt` | -12–12 dB | 0 | |
//! | 106 | `compThreshold` | -60–0 dB | -12 | |
//! | 107 | `compRatio` | 1–20 | 4 | 0.35 |
//! | 108 | `compAttack` | 0.1–60 ms | 10 | 0.35 |
//! | 109 | `compRelease` | 10–500 ms | 120 | 0.35 |
//! | 110 | `compKnee` | 0–24 dB | 6 | |
//! | 111 | `scHpfHz` | 20–400 Hz | 90 | 0.35 |
//! | 112 | `compMix` | 0–1 | 1 | |
//! | 113 | `satType` | Tanh/Diode/Tape | Tanh | |
//! | 114 | `satDrive` | 0–36 dB | 6 | |
//! | 115 | `satBias` | -12–12 dB | 0 | |
//! | 116 | `satAsym` | 0–1 | 0.25 | |
//! | 117 | `osFactor` | 1x/2x/4x | 2x | |
//! | 118 | `satMix` | 0–1 | 0.8 | |
//! | 119 | `tilt` | -6–6 dB | 0 | |
//! | 120 | `bodyHz` | 60–400 Hz | 180 | 0.35 |
//! | 121 | `bodyGain` | -12–12 dB | 0 | |
//! | 122 | `gateThresh` | -60–0 dB | -40 | |
//! | 123 | `gateRatio` | 1–8 | 2 | |
//! | 124 | `gateAtt` | 0.1–20 ms | 1 | 0.35 |
//! | 125 | `gateRel` | 5–400 ms | 120 | 0.35 |
//! | 126 | `gateHyst` | 0–12 dB | 3 | |
//! | 127 | `clipCeil` | -12 – -0.1 dBFS | -0.5 | |
//! | 128 | `limLook` | 0–3 ms | 0.5 | |
//! | 129 | `dryWet` | 0–1 | 1 | |
//! | 130 | `autoGain` | Off/On | On | |
//! | 131 | `outputTrim` | -24–24 dB | 0 | |

use drumforge_core::{OversampleFactor, ParamDescriptor, ParamId};

/// Number of parameters.
pub const PARAM_COUNT: usize = 32;

/// Base of the numeric id range; ids are `PARAM_ID_BASE + index`.
pub const PARAM_ID_BASE: u32 = 100;

/// Drum voicing. Selects a set of default filter corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrumMode {
    /// Kick drum.
    Kick,
    /// Snare drum.
    #[default]
    Snare,
    /// Toms.
    Tom,
    /// Hi-hat and cymbals.
    Hat,
    /// Auxiliary percussion.
    Perc,
    /// Drum bus.
    Bus,
}

impl DrumMode {
    /// All modes in choice order.
    pub const ALL: [DrumMode; 6] = [
        DrumMode::Kick,
        DrumMode::Snare,
        DrumMode::Tom,
        DrumMode::Hat,
        DrumMode::Perc,
        DrumMode::Bus,
    ];

    /// Choice labels, in index order.
    pub const LABELS: &'static [&'static str] = &["Kick", "Snare", "Tom", "Hat", "Perc", "Bus"];

    /// Mode for a choice index. Out-of-range indices map to [`DrumMode::Bus`].
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(DrumMode::Bus)
    }

    /// Choice index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }

    /// Case-insensitive label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::LABELS
            .iter()
            .position(|l| l.eq_ignore_ascii_case(label))
            .map(Self::from_index)
    }
}

/// Waveshaping curve of the saturator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaturationType {
    /// Symmetric `tanh`.
    #[default]
    Tanh,
    /// Asymmetric diode-style clipper.
    Diode,
    /// Rational tape curve.
    Tape,
}

impl SaturationType {
    /// Choice labels, in index order.
    pub const LABELS: &'static [&'static str] = &["Tanh", "Diode", "Tape"];

    /// Type for a choice index. Out-of-range indices map to [`SaturationType::Tape`].
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Tanh,
            1 => Self::Diode,
            _ => Self::Tape,
        }
    }

    /// Choice index of this type.
    pub fn index(self) -> usize {
        self as usize
    }
}

const OVERSAMPLING_LABELS: &[&str] = &["1x", "2x", "4x"];

/// Addresses one entry of [`DESCRIPTORS`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    InputTrim,
    Mode,
    HpfHz,
    LpfHz,
    AttackAmount,
    SustainAmount,
    CompThreshold,
    CompRatio,
    CompAttack,
    CompRelease,
    CompKnee,
    SidechainHpfHz,
    CompMix,
    SatType,
    SatDrive,
    SatBias,
    SatAsym,
    Oversampling,
    SatMix,
    Tilt,
    BodyHz,
    BodyGain,
    GateThreshold,
    GateRatio,
    GateAttack,
    GateRelease,
    GateHysteresis,
    ClipCeiling,
    Lookahead,
    DryWet,
    AutoGain,
    OutputTrim,
}

impl Param {
    /// Every parameter, in table order.
    pub const ALL: [Param; PARAM_COUNT] = [
        Param::InputTrim,
        Param::Mode,
        Param::HpfHz,
        Param::LpfHz,
        Param::AttackAmount,
        Param::SustainAmount,
        Param::CompThreshold,
        Param::CompRatio,
        Param::CompAttack,
        Param::CompRelease,
        Param::CompKnee,
        Param::SidechainHpfHz,
        Param::CompMix,
        Param::SatType,
        Param::SatDrive,
        Param::SatBias,
        Param::SatAsym,
        Param::Oversampling,
        Param::SatMix,
        Param::Tilt,
        Param::BodyHz,
        Param::BodyGain,
        Param::GateThreshold,
        Param::GateRatio,
        Param::GateAttack,
        Param::GateRelease,
        Param::GateHysteresis,
        Param::ClipCeiling,
        Param::Lookahead,
        Param::DryWet,
        Param::AutoGain,
        Param::OutputTrim,
    ];

    /// Position in [`DESCRIPTORS`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parameter at a table position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Descriptor for this parameter.
    #[inline]
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self.index()]
    }

    /// Stable numeric id.
    pub fn id(self) -> ParamId {
        self.descriptor().id
    }

    /// Stable string id.
    pub fn string_id(self) -> &'static str {
        self.descriptor().string_id
    }

    /// Parameter with the given numeric id.
    pub fn from_id(id: ParamId) -> Option<Self> {
        id.0.checked_sub(PARAM_ID_BASE)
            .and_then(|i| Self::from_index(i as usize))
    }

    /// Parameter with the given string id (exact match).
    pub fn from_string_id(string_id: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.string_id() == string_id)
    }
}

const fn id(index: u32) -> ParamId {
    ParamId(PARAM_ID_BASE + index)
}

/// Descriptor table, indexed by [`Param::index`].
pub static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::gain_db("Input", "Input", -24.0, 24.0, 0.0).with_id(id(0), "inputTrim"),
    ParamDescriptor::choice("Mode", "Mode", DrumMode::LABELS, 1).with_id(id(1), "mode"),
    ParamDescriptor::frequency_hz("HPF Hz", "HPF", 10.0, 400.0, 30.0)
        .with_id(id(2), "hpfHz")
        .with_skew(0.25),
    ParamDescriptor::frequency_hz("LPF Hz", "LPF", 2000.0, 22000.0, 20000.0)
        .with_id(id(3), "lpfHz")
        .with_skew(0.3),
    ParamDescriptor::gain_db("Attack", "Attack", -12.0, 12.0, 2.0).with_id(id(4), "attAmt"),
    ParamDescriptor::gain_db("Sustain", "Sustain", -12.0, 12.0, 0.0).with_id(id(5), "susAmt"),
    ParamDescriptor::gain_db("Comp Thresh", "Thresh", -60.0, 0.0, -12.0)
        .with_id(id(6), "compThreshold"),
    ParamDescriptor::ratio("Comp Ratio", "Ratio", 1.0, 20.0, 4.0)
        .with_id(id(7), "compRatio")
        .with_skew(0.35),
    ParamDescriptor::time_ms("Comp Att ms", "C.Att", 0.1, 60.0, 10.0)
        .with_id(id(8), "compAttack")
        .with_skew(0.35),
    ParamDescriptor::time_ms("Comp Rel ms", "C.Rel", 10.0, 500.0, 120.0)
        .with_id(id(9), "compRelease")
        .with_skew(0.35),
    ParamDescriptor::gain_db("Comp Knee", "Knee", 0.0, 24.0, 6.0).with_id(id(10), "compKnee"),
    ParamDescriptor::frequency_hz("SC HPF Hz", "SC HPF", 20.0, 400.0, 90.0)
        .with_id(id(11), "scHpfHz")
        .with_skew(0.35),
    ParamDescriptor::amount("Comp Mix", "C.Mix", 1.0).with_id(id(12), "compMix"),
    ParamDescriptor::choice("Saturation", "SatType", SaturationType::LABELS, 0)
        .with_id(id(13), "satType"),
    ParamDescriptor::gain_db("Drive", "Drive", 0.0, 36.0, 6.0).with_id(id(14), "satDrive"),
    ParamDescriptor::gain_db("Bias", "Bias", -12.0, 12.0, 0.0).with_id(id(15), "satBias"),
    ParamDescriptor::amount("Asymmetry", "Asym", 0.25).with_id(id(16), "satAsym"),
    ParamDescriptor::choice("Oversampling", "OS", OVERSAMPLING_LABELS, 1).with_id(id(17), "osFactor"),
    ParamDescriptor::amount("Sat Mix", "S.Mix", 0.8).with_id(id(18), "satMix"),
    ParamDescriptor::gain_db("Tilt", "Tilt", -6.0, 6.0, 0.0).with_id(id(19), "tilt"),
    ParamDescriptor::frequency_hz("Body Hz", "Body Hz", 60.0, 400.0, 180.0)
        .with_id(id(20), "bodyHz")
        .with_skew(0.35),
    ParamDescriptor::gain_db("Body Gain", "Body", -12.0, 12.0, 0.0).with_id(id(21), "bodyGain"),
    ParamDescriptor::gain_db("Gate Thresh", "G.Thr", -60.0, 0.0, -40.0)
        .with_id(id(22), "gateThresh"),
    ParamDescriptor::ratio("Gate Ratio", "G.Ratio", 1.0, 8.0, 2.0).with_id(id(23), "gateRatio"),
    ParamDescriptor::time_ms("Gate Att ms", "G.Att", 0.1, 20.0, 1.0)
        .with_id(id(24), "gateAtt")
        .with_skew(0.35),
    ParamDescriptor::time_ms("Gate Rel ms", "G.Rel", 5.0, 400.0, 120.0)
        .with_id(id(25), "gateRel")
        .with_skew(0.35),
    ParamDescriptor::gain_db("Gate Hyst dB", "G.Hyst", 0.0, 12.0, 3.0).with_id(id(26), "gateHyst"),
    ParamDescriptor::gain_db("Ceiling dBFS", "Ceiling", -12.0, -0.1, -0.5).with_id(id(27), "clipCeil"),
    ParamDescriptor::time_ms("Lookahead ms", "Look", 0.0, 3.0, 0.5).with_id(id(28), "limLook"),
    ParamDescriptor::amount("Dry/Wet", "Dry/Wet", 1.0).with_id(id(29), "dryWet"),
    ParamDescriptor::toggle("Auto Gain", "AutoGain", true).with_id(id(30), "autoGain"),
    ParamDescriptor::gain_db("Output", "Output", -24.0, 24.0, 0.0).with_id(id(31), "outputTrim"),
];

/// Read-only parameter values for one block.
///
/// Construct with [`Default`] (documented defaults), [`ParamSnapshot::from_lookup`]
/// (from a store) or struct-update syntax in tests. Processing always works
/// on [`clamped`](Self::clamped) values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Input trim in dB.
    pub input_trim_db: f32,
    /// Drum voicing.
    pub mode: DrumMode,
    /// Input high-pass cutoff in Hz.
    pub hpf_hz: f32,
    /// Input low-pass cutoff in Hz.
    pub lpf_hz: f32,
    /// Transient attack emphasis in dB.
    pub attack_amount_db: f32,
    /// Transient sustain emphasis in dB.
    pub sustain_amount_db: f32,
    /// Compressor threshold in dB.
    pub comp_threshold_db: f32,
    /// Compressor ratio (n:1).
    pub comp_ratio: f32,
    /// Compressor attack in ms.
    pub comp_attack_ms: f32,
    /// Compressor release in ms.
    pub comp_release_ms: f32,
    /// Compressor knee width in dB.
    pub comp_knee_db: f32,
    /// Compressor detector high-pass cutoff in Hz.
    pub sidechain_hpf_hz: f32,
    /// Compressor wet amount.
    pub comp_mix: f32,
    /// Saturation curve.
    pub sat_type: SaturationType,
    /// Saturation drive in dB.
    pub sat_drive_db: f32,
    /// Saturation bias in dB.
    pub sat_bias_db: f32,
    /// Diode asymmetry.
    pub sat_asym: f32,
    /// Oversampling factor. Applied on the next `prepare`.
    pub oversampling: OversampleFactor,
    /// Saturation wet amount.
    pub sat_mix: f32,
    /// Tilt EQ amount in dB (positive = darker).
    pub tilt_db: f32,
    /// Body peak frequency in Hz.
    pub body_hz: f32,
    /// Body peak gain in dB.
    pub body_gain_db: f32,
    /// Gate open threshold in dB.
    pub gate_threshold_db: f32,
    /// Gate expansion ratio below the close threshold.
    pub gate_ratio: f32,
    /// Gate detector attack in ms.
    pub gate_attack_ms: f32,
    /// Gate detector release in ms.
    pub gate_release_ms: f32,
    /// Gate hysteresis in dB.
    pub gate_hysteresis_db: f32,
    /// Clipper ceiling in dBFS.
    pub clip_ceiling_db: f32,
    /// Limiter look-ahead in ms.
    pub lookahead_ms: f32,
    /// Chain wet amount.
    pub dry_wet: f32,
    /// Automatic output compensation.
    pub auto_gain: bool,
    /// Output trim in dB.
    pub output_trim_db: f32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ParamSnapshot {
    /// Builds a snapshot by asking `lookup` for every parameter.
    ///
    /// `None` and non-finite values fall back to the descriptor default;
    /// everything else is clamped, choices rounded, toggles thresholded.
    pub fn from_lookup(mut lookup: impl FnMut(Param) -> Option<f32>) -> Self {
        let mut read = |p: Param| {
            let desc = p.descriptor();
            desc.sanitize(lookup(p).unwrap_or(desc.default))
        };
        Self {
            input_trim_db: read(Param::InputTrim),
            mode: DrumMode::from_index(read(Param::Mode) as usize),
            hpf_hz: read(Param::HpfHz),
            lpf_hz: read(Param::LpfHz),
            attack_amount_db: read(Param::AttackAmount),
            sustain_amount_db: read(Param::SustainAmount),
            comp_threshold_db: read(Param::CompThreshold),
            comp_ratio: read(Param::CompRatio),
            comp_attack_ms: read(Param::CompAttack),
            comp_release_ms: read(Param::CompRelease),
            comp_knee_db: read(Param::CompKnee),
            sidechain_hpf_hz: read(Param::SidechainHpfHz),
            comp_mix: read(Param::CompMix),
            sat_type: SaturationType::from_index(read(Param::SatType) as usize),
            sat_drive_db: read(Param::SatDrive),
            sat_bias_db: read(Param::SatBias),
            sat_asym: read(Param::SatAsym),
            oversampling: OversampleFactor::from_index(read(Param::Oversampling) as usize),
            sat_mix: read(Param::SatMix),
            tilt_db: read(Param::Tilt),
            body_hz: read(Param::BodyHz),
            body_gain_db: read(Param::BodyGain),
            gate_threshold_db: read(Param::GateThreshold),
            gate_ratio: read(Param::GateRatio),
            gate_attack_ms: read(Param::GateAttack),
            gate_release_ms: read(Param::GateRelease),
            gate_hysteresis_db: read(Param::GateHysteresis),
            clip_ceiling_db: read(Param::ClipCeiling),
            lookahead_ms: read(Param::Lookahead),
            dry_wet: read(Param::DryWet),
            auto_gain: read(Param::AutoGain) >= 0.5,
            output_trim_db: read(Param::OutputTrim),
        }
    }

    /// Plain value of one parameter. Choices return their index, toggles 0/1.
    pub fn value(&self, param: Param) -> f32 {
        match param {
            Param::InputTrim => self.input_trim_db,
            Param::Mode => self.mode.index() as f32,
            Param::HpfHz => self.hpf_hz,
            Param::LpfHz => self.lpf_hz,
            Param::AttackAmount => self.attack_amount_db,
            Param::SustainAmount => self.sustain_amount_db,
            Param::CompThreshold => self.comp_threshold_db,
            Param::CompRatio => self.comp_ratio,
            Param::CompAttack => self.comp_attack_ms,
            Param::CompRelease => self.comp_release_ms,
            Param::CompKnee => self.comp_knee_db,
            Param::SidechainHpfHz => self.sidechain_hpf_hz,
            Param::CompMix => self.comp_mix,
            Param::SatType => self.sat_type.index() as f32,
            Param::SatDrive => self.sat_drive_db,
            Param::SatBias => self.sat_bias_db,
            Param::SatAsym => self.sat_asym,
            Param::Oversampling => self.oversampling.index() as f32,
            Param::SatMix => self.sat_mix,
            Param::Tilt => self.tilt_db,
            Param::BodyHz => self.body_hz,
            Param::BodyGain => self.body_gain_db,
            Param::GateThreshold => self.gate_threshold_db,
            Param::GateRatio => self.gate_ratio,
            Param::GateAttack => self.gate_attack_ms,
            Param::GateRelease => self.gate_release_ms,
            Param::GateHysteresis => self.gate_hysteresis_db,
            Param::ClipCeiling => self.clip_ceiling_db,
            Param::Lookahead => self.lookahead_ms,
            Param::DryWet => self.dry_wet,
            Param::AutoGain => {
                if self.auto_gain {
                    1.0
                } else {
                    0.0
                }
            }
            Param::OutputTrim => self.output_trim_db,
        }
    }

    /// Copy with one parameter replaced (sanitized like any other input).
    #[must_use]
    pub fn with_value(&self, param: Param, value: f32) -> Self {
        Self::from_lookup(|p| Some(if p == param { value } else { self.value(p) }))
    }

    /// Copy with every value clamped into its range and non-finite values
    /// replaced by defaults.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self::from_lookup(|p| Some(self.value(p)))
    }

    /// Normalized (0–1) value of one parameter.
    pub fn normalized(&self, param: Param) -> f32 {
        param.descriptor().normalize(self.value(param))
    }
}
