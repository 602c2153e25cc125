//! Drum modes and the default-following nudge applied on mode changes.
//!
//! Each [`DrumMode`] carries default corners for the input high-pass, the
//! compressor sidechain high-pass and the body peak. When the mode changes,
//! parameters the user has left at the previous mode's default follow the
//! new mode; anything the user moved stays where it is.

use libm::fabsf;

use crate::params::{DrumMode, Param, ParamSnapshot};

/// Normalized distance under which a value counts as "still at the default".
pub const NUDGE_TOLERANCE: f32 = 0.01;

/// Mode-dependent defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDefaults {
    /// Input high-pass cutoff in Hz.
    pub hpf_hz: f32,
    /// Sidechain high-pass cutoff in Hz.
    pub sc_hpf_hz: f32,
    /// Body peak frequency in Hz.
    pub body_hz: f32,
}

impl ModeDefaults {
    /// Default for one of the mode-dependent parameters.
    pub fn get(&self, param: Param) -> Option<f32> {
        match param {
            Param::HpfHz => Some(self.hpf_hz),
            Param::SidechainHpfHz => Some(self.sc_hpf_hz),
            Param::BodyHz => Some(self.body_hz),
            _ => None,
        }
    }
}

impl DrumMode {
    /// Default corners for this mode.
    pub const fn defaults(self) -> ModeDefaults {
        let (hpf_hz, sc_hpf_hz, body_hz) = match self {
            DrumMode::Kick => (25.0, 60.0, 80.0),
            DrumMode::Snare => (70.0, 120.0, 180.0),
            DrumMode::Tom => (45.0, 90.0, 140.0),
            DrumMode::Hat => (140.0, 180.0, 260.0),
            DrumMode::Perc => (80.0, 140.0, 200.0),
            DrumMode::Bus => (30.0, 120.0, 160.0),
        };
        ModeDefaults {
            hpf_hz,
            sc_hpf_hz,
            body_hz,
        }
    }
}

/// Parameters whose defaults depend on the mode.
pub const MODE_DEPENDENT: [Param; 3] = [Param::HpfHz, Param::SidechainHpfHz, Param::BodyHz];

/// A value the store should write after a mode change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamNudge {
    /// Parameter to write.
    pub param: Param,
    /// New plain value.
    pub value: f32,
}

/// Nudges implied by switching from `current.mode` to `next`.
///
/// A parameter is nudged when its normalized value is strictly within
/// [`NUDGE_TOLERANCE`] of the previous mode's default, and differs from the
/// new default. Switching to the same mode yields nothing.
pub fn mode_nudges(next: DrumMode, current: &ParamSnapshot) -> impl Iterator<Item = ParamNudge> {
    let previous = current.mode.defaults();
    let target = next.defaults();
    let values = MODE_DEPENDENT.map(|p| (p, current.value(p)));
    values.into_iter().filter_map(move |(param, value)| {
        let desc = param.descriptor();
        let old_default = previous.get(param)?;
        let new_default = target.get(param)?;
        let distance = fabsf(desc.normalize(value) - desc.normalize(old_default));
        (distance < NUDGE_TOLERANCE && value != new_default).then_some(ParamNudge {
            param,
            value: new_default,
        })
    })
}

/// Applies [`mode_nudges`] and the mode itself to a snapshot copy.
#[must_use]
pub fn apply_mode(next: DrumMode, current: &ParamSnapshot) -> ParamSnapshot {
    let mut out = current.with_value(Param::Mode, next.index() as f32);
    for nudge in mode_nudges(next, current) {
        out = out.with_value(nudge.param, nudge.value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_mode_defaults(mode: DrumMode) -> ParamSnapshot {
        let d = mode.defaults();
        ParamSnapshot {
            mode,
            hpf_hz: d.hpf_hz,
            sidechain_hpf_hz: d.sc_hpf_hz,
            body_hz: d.body_hz,
            ..ParamSnapshot::default()
        }
    }

    #[test]
    fn test_defaults_within_ranges() {
        for mode in DrumMode::ALL {
            let d = mode.defaults();
            for param in MODE_DEPENDENT {
                let v = d.get(param).unwrap();
                assert_eq!(param.descriptor().clamp(v), v, "{mode:?} {param:?}");
            }
        }
        assert_eq!(ModeDefaults::get(&DrumMode::Kick.defaults(), Param::Tilt), None);
    }

    #[test]
    fn test_untouched_params_follow_mode() {
        let current = at_mode_defaults(DrumMode::Snare);
        let nudges: Vec<_> = mode_nudges(DrumMode::Kick, &current).collect();
        assert_eq!(
            nudges,
            vec![
                ParamNudge { param: Param::HpfHz, value: 25.0 },
                ParamNudge { param: Param::SidechainHpfHz, value: 60.0 },
                ParamNudge { param: Param::BodyHz, value: 80.0 },
            ]
        );
        let next = apply_mode(DrumMode::Kick, &current);
        assert_eq!(next, at_mode_defaults(DrumMode::Kick));
    }

    #[test]
    fn test_user_values_are_kept() {
        let current = ParamSnapshot {
            hpf_hz: 200.0,
            ..at_mode_defaults(DrumMode::Snare)
        };
        let next = apply_mode(DrumMode::Kick, &current);
        assert_eq!(next.mode, DrumMode::Kick);
        assert_eq!(next.hpf_hz, 200.0);
        assert_eq!(next.sidechain_hpf_hz, 60.0);
        assert_eq!(next.body_hz, 80.0);
    }

    #[test]
    fn test_tolerance_is_strict_and_normalized() {
        let desc = Param::BodyHz.descriptor();
        let base = desc.normalize(180.0);
        let near = desc.denormalize(base + 0.005);
        let far = desc.denormalize(base + 0.02);

        let current = ParamSnapshot {
            body_hz: near,
            ..at_mode_defaults(DrumMode::Snare)
        };
        assert_eq!(apply_mode(DrumMode::Tom, &current).body_hz, 140.0);

        let current = ParamSnapshot {
            body_hz: far,
            ..at_mode_defaults(DrumMode::Snare)
        };
        assert_eq!(apply_mode(DrumMode::Tom, &current).body_hz, far);
    }

    #[test]
    fn test_same_mode_is_a_no_op() {
        let current = at_mode_defaults(DrumMode::Hat);
        assert_eq!(mode_nudges(DrumMode::Hat, &current).count(), 0);
    }
}
