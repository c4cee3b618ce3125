//! Fixed lock-up tier table.

use crate::error::{Error, Result};
use crate::Day;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lock-up tier chosen when a stake is created.
///
/// The numeric index of each variant is the tier index used in action logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 1x, no lock. Rewards accrue on the side and never re-weight.
    Flexible = 0,
    /// 1.3x, 90 days.
    Quarter = 1,
    /// 1.6x, 180 days.
    HalfYear = 2,
    /// 2.2x, 365 days.
    Year = 3,
    /// 3x, 365 days.
    YearBoosted = 4,
}

impl Tier {
    /// All tiers in index order.
    pub const ALL: [Self; 5] = [
        Self::Flexible,
        Self::Quarter,
        Self::HalfYear,
        Self::Year,
        Self::YearBoosted,
    ];

    /// Looks up a tier by its table index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTier`] for indices outside `0..=4`.
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(Error::UnknownTier(index))
    }

    /// Table index of this tier.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Reward weight multiplier.
    pub fn multiplier(self) -> BigDecimal {
        // (digits, scale): 13 with scale 1 is 1.3
        let (digits, scale) = match self {
            Self::Flexible => (1, 0),
            Self::Quarter => (13, 1),
            Self::HalfYear => (16, 1),
            Self::Year => (22, 1),
            Self::YearBoosted => (3, 0),
        };
        BigDecimal::new(BigInt::from(digits), scale)
    }

    /// Minimum number of elapsed days before the ledger accepts an unstake.
    ///
    /// `Year` and `YearBoosted` share the same lock and differ only in weight.
    pub const fn lock_days(self) -> Day {
        match self {
            Self::Flexible => 0,
            Self::Quarter => 90,
            Self::HalfYear => 180,
            Self::Year | Self::YearBoosted => 365,
        }
    }

    /// Whether daily rewards are folded into the principal.
    pub const fn is_compounding(self) -> bool {
        !matches!(self, Self::Flexible)
    }
}

impl TryFrom<u8> for Tier {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
