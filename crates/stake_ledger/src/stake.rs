//! A single stake held in the ledger.

use crate::decimal::DecimalContext;
use crate::tier::Tier;
use crate::Day;
use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a stake inside the ledger arena.
///
/// Ids are assigned in creation order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StakeId(pub usize);

impl fmt::Display for StakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Funds locked by one owner under one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stake {
    /// Arena handle.
    pub id: StakeId,
    /// Owner identifier.
    pub owner: String,
    /// Principal. Grows daily for compounding tiers.
    pub amount: BigDecimal,
    /// Lock-up tier.
    pub tier: Tier,
    /// Side-accrued rewards. Only the flexible tier uses this.
    pub accrued: BigDecimal,
    /// Ledger day on which the stake was created.
    pub start_day: Day,
}

impl Stake {
    /// Creates a stake with an empty reward accumulator.
    pub fn new(
        id: StakeId,
        owner: impl Into<String>,
        amount: BigDecimal,
        tier: Tier,
        start_day: Day,
    ) -> Self {
        Self {
            id,
            owner: owner.into(),
            amount,
            tier,
            accrued: BigDecimal::zero(),
            start_day,
        }
    }

    /// `amount x multiplier`.
    pub fn weighted(&self, ctx: &DecimalContext) -> BigDecimal {
        ctx.mul(&self.amount, &self.tier.multiplier())
    }

    /// What an unstake pays out: principal plus side-accrued rewards.
    pub fn value(&self, ctx: &DecimalContext) -> BigDecimal {
        ctx.add(&self.amount, &self.accrued)
    }

    /// Days elapsed since creation, as seen on `day`.
    pub const fn elapsed(&self, day: Day) -> Day {
        day.saturating_sub(self.start_day)
    }

    /// First day on which the ledger accepts an unstake.
    pub const fn unlocks_on(&self) -> Day {
        self.start_day + self.tier.lock_days()
    }

    /// Whether the stake is still inside its lock period on `day`.
    pub const fn is_locked(&self, day: Day) -> bool {
        self.elapsed(day) < self.tier.lock_days()
    }

    /// Folds one day's reward into the stake according to its tier.
    pub(crate) fn credit(&mut self, reward: &BigDecimal, ctx: &DecimalContext) {
        if self.tier.is_compounding() {
            self.amount = ctx.add(&self.amount, reward);
        } else {
            self.accrued = ctx.add(&self.accrued, reward);
        }
    }
}
