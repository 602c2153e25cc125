//! Tagged result of running one processing stage on a block.
//!
//! Stages never unwind. Each returns a [`StageOutcome`] and the chain decides
//! what happens to the block.
//!
//! | Outcome | Stage left the block | Chain reaction |
//! |---------|----------------------|----------------|
//! | `Ok` | processed | continue |
//! | `Degraded` | neutral for this stage (passthrough or restored input) | continue, report |
//! | `Fatal` | in an unusable state | optional stages: restore dry copy; mandatory filters: zero the block |

/// Result of a single stage on a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageOutcome {
    /// The stage processed the block normally.
    #[default]
    Ok,
    /// The stage fell back to neutral behaviour for this block.
    Degraded,
    /// The block cannot be trusted past this stage.
    Fatal,
}

impl StageOutcome {
    /// The more severe of two outcomes.
    #[inline]
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Fatal, _) | (_, Self::Fatal) => Self::Fatal,
            (Self::Degraded, _) | (_, Self::Degraded) => Self::Degraded,
            _ => Self::Ok,
        }
    }

    /// `Ok` if `condition` holds, otherwise `Degraded`.
    #[inline]
    pub fn degraded_unless(condition: bool) -> Self {
        if condition { Self::Ok } else { Self::Degraded }
    }

    /// True for [`StageOutcome::Fatal`].
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == Self::Fatal
    }
}
