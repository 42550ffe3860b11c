//! Reward point balances.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative reward point amount.
///
/// Used both for a user's balance and for deltas (points awarded by a
/// report, points required by an incentive). Arithmetic saturates so a
/// balance can never go below zero or wrap.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(u32);

impl Points {
    /// Zero points.
    pub const ZERO: Self = Self(0);

    /// Create a point amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Add an award to this balance, saturating at `u32::MAX`.
    #[must_use]
    pub const fn credit(self, award: Self) -> Self {
        Self(self.0.saturating_add(award.0))
    }

    /// Subtract a cost from this balance, saturating at zero.
    #[must_use]
    pub const fn debit(self, cost: Self) -> Self {
        Self(self.0.saturating_sub(cost.0))
    }

    /// Whether this balance covers `cost`.
    #[must_use]
    pub const fn covers(self, cost: Self) -> bool {
        self.0 >= cost.0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Points {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
