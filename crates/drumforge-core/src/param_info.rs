//! Parameter descriptors for discoverable, host-facing parameters.
//!
//! Each parameter is described by a [`ParamDescriptor`] containing metadata for
//! display, validation, and persistence:
//!
//! - [`ParamId`] — stable numeric ID for automation and state blobs
//! - [`ParamKind`] — continuous, choice (N labels) or boolean toggle
//! - [`ParamScale`] — normalization curve (linear, logarithmic, power/skew)
//! - [`ParamFlags`] — capability flags (automatable, stepped, etc.)
//! - `string_id` — human-readable stable ID used by presets
//!
//! All constructors are `const fn` so parameter tables can live in statics.
//!
//! # Example
//!
//! ```rust
//! use drumforge_core::{ParamDescriptor, ParamId};
//!
//! const RATIO: ParamDescriptor = ParamDescriptor::ratio("Ratio", "Ratio", 1.0, 20.0, 4.0)
//!     .with_id(ParamId(7), "compRatio")
//!     .with_skew(0.35);
//!
//! assert_eq!(RATIO.sanitize(100.0), 20.0);
//! assert_eq!(RATIO.sanitize(f32::NAN), 4.0);
//! assert!((RATIO.denormalize(RATIO.normalize(6.0)) - 6.0).abs() < 1e-4);
//! ```

/// Scaling curve for parameter normalization.
///
/// Determines how a parameter's plain value maps to normalized \[0.0, 1.0\] space.
///
/// # Normalization Formulas
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`
/// - **Power(exp)**: `normalized = ((value - min) / (max - min)).powf(1.0 / exp)`
///
/// A skew factor `s` (more resolution at the low end for `s < 1`) is
/// `Power(1/s)`; see [`ParamDescriptor::with_skew`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default). Equal resolution across the range.
    #[default]
    Linear,
    /// Logarithmic mapping. Requires `min > 0.0`.
    Logarithmic,
    /// Power curve mapping with configurable exponent.
    /// exponent > 1.0 → more resolution at low end.
    Power(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter:
/// saved state blobs are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// ```rust
/// use drumforge_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::AUTOMATABLE));
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!flags.contains(ParamFlags::HIDDEN));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps (enum-like, integer values).
    pub const STEPPED: Self = Self(1 << 1);
    /// Parameter should be hidden from generic host UI.
    pub const HIDDEN: Self = Self(1 << 2);
    /// Parameter is read-only (metering, display only).
    pub const READ_ONLY: Self = Self(1 << 3);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// What kind of value a parameter holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any value in `[min, max]`.
    Continuous,
    /// An index into [`ParamDescriptor::labels`], stored as a float.
    Choice,
    /// `0.0` (off) or `1.0` (on).
    Toggle,
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - for gain, threshold, and level parameters.
    Decibels,

    /// Hertz (Hz) - for filter corner and band frequencies.
    Hertz,

    /// Milliseconds (ms) - for attack, release and look-ahead times.
    Milliseconds,

    /// Percentage (%) - for displayed mix amounts.
    Percent,

    /// Ratio (n:1) - for compressor and gate ratios.
    Ratio,

    /// No unit - for dimensionless or custom parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use drumforge_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Metadata describing a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Input Trim").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Value kind.
    pub kind: ParamKind,

    /// Minimum allowed value for this parameter.
    pub min: f32,

    /// Maximum allowed value for this parameter.
    pub max: f32,

    /// Default value used on initialization and as fallback for missing or
    /// unreadable values.
    pub default: f32,

    /// Recommended step increment.
    pub step: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID for presets and debugging.
    pub string_id: &'static str,

    /// Normalization curve. Default: [`ParamScale::Linear`].
    pub scale: ParamScale,

    /// Capability flags. Default: [`ParamFlags::AUTOMATABLE`].
    pub flags: ParamFlags,

    /// Display labels for [`ParamKind::Choice`] (empty otherwise).
    pub labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Continuous parameter with a custom unit and range.
    pub const fn continuous(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            kind: ParamKind::Continuous,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            labels: &[],
        }
    }

    /// Gain parameter with custom name and range (decibels).
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::Decibels, min, max, default).with_step(0.1)
    }

    /// Time parameter with custom name and range (milliseconds).
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::Milliseconds, min, max, default)
    }

    /// Frequency parameter with custom name and range (Hz).
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::Hertz, min, max, default).with_step(1.0)
    }

    /// Ratio parameter (n:1).
    pub const fn ratio(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::Ratio, min, max, default)
    }

    /// Unitless amount in `[0, 1]` (mix, asymmetry).
    pub const fn amount(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self::continuous(name, short_name, ParamUnit::None, 0.0, 1.0, default)
    }

    /// Choice parameter over `labels`, stored as the selected index.
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default_index: usize,
    ) -> Self {
        let max = if labels.is_empty() { 0.0 } else { (labels.len() - 1) as f32 };
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            kind: ParamKind::Choice,
            min: 0.0,
            max,
            default: default_index as f32,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            labels,
        }
    }

    /// Boolean parameter stored as `0.0`/`1.0`.
    pub const fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            kind: ParamKind::Toggle,
            min: 0.0,
            max: 1.0,
            default: if default_on { 1.0 } else { 0.0 },
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            labels: &[],
        }
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets a skew factor: `normalized = linear^skew`.
    ///
    /// Skews below 1 spread the low end of the range over more of the
    /// normalized travel.
    pub const fn with_skew(self, skew: f32) -> Self {
        self.with_scale(ParamScale::Power(1.0 / skew))
    }

    /// Sets the step increment.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// ```rust
    /// use drumforge_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0);
    /// assert_eq!(desc.clamp(-100.0), -60.0);
    /// assert_eq!(desc.clamp(100.0), 12.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Brings any value into a valid plain value for this parameter.
    ///
    /// Non-finite input (NaN, ±inf) maps to the default; everything else is
    /// clamped. Choices are rounded to the nearest index and toggles to 0/1.
    #[inline]
    pub fn sanitize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = self.clamp(value);
        match self.kind {
            ParamKind::Continuous => clamped,
            ParamKind::Choice => libm::roundf(clamped),
            ParamKind::Toggle => {
                if clamped >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Label of the choice selected by `value`, if this is a choice parameter.
    pub fn label(&self, value: f32) -> Option<&'static str> {
        match self.kind {
            ParamKind::Choice => self.labels.get(self.sanitize(value) as usize).copied(),
            ParamKind::Toggle => Some(if self.sanitize(value) >= 0.5 { "On" } else { "Off" }),
            ParamKind::Continuous => None,
        }
    }

    /// Index of `label` among this parameter's choice labels.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.eq_ignore_ascii_case(label))
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    ///
    /// The value is clamped to the range first.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let value = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
            ParamScale::Power(exp) => {
                let linear = (value - self.min) / range;
                libm::powf(linear, 1.0 / exp)
            }
        }
    }

    /// Converts a normalized value (0.0 to 1.0) to the actual parameter range.
    ///
    /// Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
            ParamScale::Power(exp) => {
                let curved = libm::powf(normalized, exp);
                self.min + curved * (self.max - self.min)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &[&str] = &["Kick", "Snare", "Tom"];

    #[test]
    fn test_continuous_defaults() {
        let desc = ParamDescriptor::gain_db("Trim", "Trim", -24.0, 24.0, 0.0);
        assert_eq!(desc.kind, ParamKind::Continuous);
        assert_eq!(desc.unit, ParamUnit::Decibels);
        assert_eq!(desc.scale, ParamScale::Linear);
        assert!(desc.flags.contains(ParamFlags::AUTOMATABLE));
        assert!(desc.label(3.0).is_none());
    }

    #[test]
    fn test_sanitize_continuous() {
        let desc = ParamDescriptor::frequency_hz("HPF", "HPF", 10.0, 400.0, 30.0);
        assert_eq!(desc.sanitize(f32::NAN), 30.0);
        assert_eq!(desc.sanitize(f32::INFINITY), 30.0);
        assert_eq!(desc.sanitize(5.0), 10.0);
        assert_eq!(desc.sanitize(123.5), 123.5);
    }

    #[test]
    fn test_choice() {
        let desc = ParamDescriptor::choice("Mode", "Mode", LABELS, 1);
        assert_eq!(desc.max, 2.0);
        assert_eq!(desc.default, 1.0);
        assert!(desc.flags.contains(ParamFlags::STEPPED));
        assert_eq!(desc.sanitize(1.6), 2.0);
        assert_eq!(desc.sanitize(-3.0), 0.0);
        assert_eq!(desc.label(2.0), Some("Tom"));
        assert_eq!(desc.label_index("snare"), Some(1));
        assert_eq!(desc.label_index("Hat"), None);
    }

    #[test]
    fn test_toggle() {
        let desc = ParamDescriptor::toggle("Auto Gain", "AutoGain", true);
        assert_eq!(desc.default, 1.0);
        assert_eq!(desc.sanitize(0.2), 0.0);
        assert_eq!(desc.sanitize(0.7), 1.0);
        assert_eq!(desc.label(1.0), Some("On"));
    }

    #[test]
    fn test_skew_maps_to_power() {
        let desc = ParamDescriptor::frequency_hz("HPF", "HPF", 10.0, 400.0, 30.0).with_skew(0.25);
        assert_eq!(desc.scale, ParamScale::Power(4.0));
        // Skew < 1 gives the low end more travel.
        assert!(desc.normalize(30.0) > (30.0 - 10.0) / 390.0);
    }

    #[test]
    fn test_normalize_roundtrip() {
        let desc = ParamDescriptor::time_ms("Release", "Rel", 10.0, 500.0, 120.0).with_skew(0.35);
        for &v in &[10.0, 50.0, 120.0, 333.0, 500.0] {
            let back = desc.denormalize(desc.normalize(v));
            assert!((back - v).abs() < 0.01, "{v} -> {back}");
        }
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        let desc = ParamDescriptor::ratio("Ratio", "Ratio", 1.0, 20.0, 4.0).with_skew(0.35);
        assert_eq!(desc.normalize(0.0), 0.0);
        assert!((desc.normalize(40.0) - 1.0).abs() < 1e-6);
        assert!(desc.normalize(0.5).is_finite());
    }

    #[test]
    fn test_logarithmic_scale() {
        let desc = ParamDescriptor::frequency_hz("Freq", "Freq", 20.0, 20000.0, 1000.0)
            .with_scale(ParamScale::Logarithmic);
        assert!((desc.normalize(20.0)).abs() < 1e-6);
        assert!((desc.normalize(20000.0) - 1.0).abs() < 1e-6);
        assert!((desc.denormalize(0.5) - 632.456).abs() < 0.5);
    }

    #[test]
    fn test_builder_chain() {
        let desc = ParamDescriptor::amount("Mix", "Mix", 0.8)
            .with_id(ParamId(18), "satMix")
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::HIDDEN))
            .with_step(0.05);
        assert_eq!(desc.id, ParamId(18));
        assert_eq!(desc.string_id, "satMix");
        assert!(desc.flags.contains(ParamFlags::HIDDEN));
        assert_eq!(desc.step, 0.05);
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
        assert_eq!(ParamUnit::Milliseconds.suffix(), " ms");
        assert_eq!(ParamUnit::Ratio.suffix(), ":1");
    }
}
