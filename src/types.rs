//! Core types for the tuner library.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction of optimization.
///
/// `Minimize` corresponds to `lower_is_better = true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Minimize the objective value.
    Minimize,
    /// Maximize the objective value.
    Maximize,
}

impl Direction {
    /// Converts a `lower_is_better` flag into a direction.
    #[must_use]
    pub fn from_lower_is_better(lower_is_better: bool) -> Self {
        if lower_is_better {
            Self::Minimize
        } else {
            Self::Maximize
        }
    }

    /// Returns `true` for [`Direction::Minimize`].
    #[must_use]
    pub fn lower_is_better(self) -> bool {
        matches!(self, Self::Minimize)
    }

    /// Returns `true` if `a` is strictly better than `b` in this direction.
    #[must_use]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Self::Minimize => a < b,
            Self::Maximize => a > b,
        }
    }
}

/// The status column of a results row.
///
/// Every status other than [`TrialStatus::Intermediate`] is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrialStatus {
    /// The trial is still running; the row is an intermediate observation.
    Intermediate,
    /// The trial finished normally.
    Completed,
    /// The trial was stopped early.
    Stopped,
    /// The trial failed.
    Failed,
}

impl TrialStatus {
    /// Returns `true` for every status except [`TrialStatus::Intermediate`].
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Intermediate)
    }
}
