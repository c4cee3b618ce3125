//! The stake ledger: live stakes, aggregate weight and daily distribution.
//!
//! Stakes live in a flat arena indexed by [`StakeId`]. Each owner keeps a FIFO
//! of handles into that arena, so ordinal addressing ("the owner's n-th live
//! stake") never searches the whole ledger.
//!
//! # Example
//!
//! ```rust,ignore
//! use stake_ledger::{LedgerConfig, StakeLedger, Tier};
//!
//! let mut ledger = StakeLedger::new(LedgerConfig::default());
//! ledger.add_stake("alice", 1_000.into(), Tier::Quarter);
//! ledger.simulate_day();
//! ```

use crate::decimal::DecimalContext;
use crate::error::{Error, Result};
use crate::stake::{Stake, StakeId};
use crate::tier::Tier;
use crate::Day;
use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Total reward paid out across all stakes every simulated day.
pub const DAILY_BUDGET: i64 = 624_657_534_246;

/// First ledger day of a fresh run.
pub const FIRST_DAY: Day = 1;

/// Configuration for a ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Arithmetic context used for every computation.
    pub context: DecimalContext,
    /// Reward distributed per day.
    pub daily_budget: BigDecimal,
    /// Day the clock starts on.
    pub starting_day: Day,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            context: DecimalContext::default(),
            daily_budget: BigDecimal::from(DAILY_BUDGET),
            starting_day: FIRST_DAY,
        }
    }
}

impl LedgerConfig {
    /// Sets the number of significant digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] when `precision` is zero.
    pub fn with_precision(mut self, precision: u64) -> Result<Self> {
        self.context = DecimalContext::new(precision)?;
        Ok(self)
    }

    /// Sets the daily reward budget.
    #[must_use]
    pub fn with_daily_budget(mut self, budget: BigDecimal) -> Self {
        self.daily_budget = budget;
        self
    }

    /// Sets the starting day.
    #[must_use]
    pub fn with_starting_day(mut self, day: Day) -> Self {
        self.starting_day = day;
        self
    }
}

/// Outcome of one reward-distribution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    /// Rewards were credited to every live stake.
    Applied {
        /// Number of stakes credited.
        stakes: usize,
        /// Sum of the rewards credited, as rounded by the context.
        distributed: BigDecimal,
    },
    /// Nothing to divide by; no stake was touched.
    Skipped,
}

impl Distribution {
    /// Whether rewards were credited.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Ledger of live stakes and their aggregate weight.
#[derive(Debug, Clone)]
pub struct StakeLedger {
    ctx: DecimalContext,
    daily_budget: BigDecimal,
    /// Arena of every stake ever added; `None` once unstaked.
    arena: Vec<Option<Stake>>,
    by_owner: HashMap<String, VecDeque<StakeId>>,
    live: usize,
    aggregate: BigDecimal,
    current_day: Day,
}

impl Default for StakeLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl StakeLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            ctx: config.context,
            daily_budget: config.daily_budget,
            arena: Vec::new(),
            by_owner: HashMap::new(),
            live: 0,
            aggregate: BigDecimal::zero(),
            current_day: config.starting_day,
        }
    }

    /// Arithmetic context of this ledger.
    pub const fn context(&self) -> &DecimalContext {
        &self.ctx
    }

    /// Reward distributed per day.
    pub const fn daily_budget(&self) -> &BigDecimal {
        &self.daily_budget
    }

    /// Current simulated day.
    pub const fn current_day(&self) -> Day {
        self.current_day
    }

    /// Running aggregate weighted stake.
    pub const fn aggregate(&self) -> &BigDecimal {
        &self.aggregate
    }

    /// Number of live stakes.
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no stake is live.
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Looks up a live stake by handle.
    pub fn stake(&self, id: StakeId) -> Option<&Stake> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    /// Live stakes in creation order.
    pub fn stakes(&self) -> impl Iterator<Item = &Stake> {
        self.arena.iter().flatten()
    }

    /// Live stakes of `owner` in creation order; position is the unstake ordinal.
    pub fn owner_stakes<'a>(&'a self, owner: &str) -> impl Iterator<Item = &'a Stake> + 'a {
        self.by_owner
            .get(owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.stake(*id))
    }

    /// Sum of `amount x multiplier` over live stakes, in creation order.
    pub fn weighted_total(&self) -> BigDecimal {
        self.ctx.sum(self.stakes().map(|s| s.weighted(&self.ctx)))
    }

    /// Adds a stake for `owner` starting today.
    pub fn add_stake(&mut self, owner: &str, amount: BigDecimal, tier: Tier) -> StakeId {
        let id = StakeId(self.arena.len());
        let stake = Stake::new(id, owner, amount, tier, self.current_day);

        self.aggregate = self.ctx.add(&self.aggregate, &stake.weighted(&self.ctx));
        self.by_owner.entry(stake.owner.clone()).or_default().push_back(id);
        self.arena.push(Some(stake));
        self.live += 1;

        debug!(day = self.current_day, owner, %id, tier = tier.index(), "stake added");
        id
    }

    /// Removes the `ordinal`-th live stake of `owner` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StakeNotFound`] when the owner has no stake at that
    /// ordinal and [`Error::StakeLocked`] while the stake is inside its lock
    /// period. The ledger is unchanged in both cases.
    pub fn unstake(&mut self, owner: &str, ordinal: usize) -> Result<BigDecimal> {
        let not_found = || Error::StakeNotFound {
            owner: owner.to_string(),
            ordinal,
        };
        let id = self
            .by_owner
            .get(owner)
            .and_then(|ids| ids.get(ordinal))
            .copied()
            .ok_or_else(not_found)?;
        let stake = self.stake(id).ok_or_else(not_found)?;

        if stake.is_locked(self.current_day) {
            return Err(Error::StakeLocked {
                owner: owner.to_string(),
                unlocks_on: stake.unlocks_on(),
                current_day: self.current_day,
            });
        }

        let value = stake.value(&self.ctx);
        let weighted = stake.weighted(&self.ctx);
        self.aggregate = self.ctx.sub(&self.aggregate, &weighted);

        if let Some(ids) = self.by_owner.get_mut(owner) {
            ids.remove(ordinal);
            if ids.is_empty() {
                self.by_owner.remove(owner);
            }
        }
        self.arena[id.0] = None;
        self.live -= 1;

        debug!(day = self.current_day, owner, %id, %value, "stake removed");
        Ok(value)
    }

    /// Credits one day's rewards pro rata and recomputes the aggregate.
    ///
    /// Every stake's share is computed against the aggregate as it stood at
    /// the start of the pass. An empty ledger or a zero aggregate skips the
    /// pass. Skipping still recomputes the aggregate, which drops any rounding
    /// residue left behind by removals.
    pub fn calculate_rewards(&mut self) -> Distribution {
        if self.is_empty() || self.aggregate.is_zero() {
            debug!(
                day = self.current_day,
                live = self.live,
                residue = %self.aggregate,
                "nothing to reward, distribution skipped"
            );
            self.aggregate = self.weighted_total();
            return Distribution::Skipped;
        }

        let ctx = self.ctx;
        let aggregate = self.aggregate.clone();
        let mut distributed = BigDecimal::zero();
        let mut stakes = 0;

        for stake in self.arena.iter_mut().flatten() {
            let scaled = ctx.mul(
                &ctx.mul(&stake.amount, &self.daily_budget),
                &stake.tier.multiplier(),
            );
            let Some(reward) = ctx.div(&scaled, &aggregate) else {
                continue;
            };
            stake.credit(&reward, &ctx);
            distributed = ctx.add(&distributed, &reward);
            stakes += 1;
        }

        self.aggregate = self.weighted_total();
        Distribution::Applied { stakes, distributed }
    }

    pub(crate) fn close_day(&mut self) {
        self.current_day += 1;
    }
}
