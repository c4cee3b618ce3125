//! Synthetic scenario generation.
//!
//! A scenario is fully determined by four numbers: staker count, duration,
//! stake rounds and unstake rounds. Every staker gets one action per round,
//! stake rounds first, with the template picked by `round % catalog size`.
//!
//! # Example
//!
//! ```rust,ignore
//! use stake_scenario::{ScenarioGenerator, ScenarioParams};
//!
//! let outcome = ScenarioGenerator::with_defaults(ScenarioParams::new(1, 1, 1, 0))?.run()?;
//! assert_eq!(outcome.to_string(), "1|stake|user1|10000000000|3/1396246575341");
//! ```

use crate::action::{Action, StakeTemplate, DEFAULT_TEMPLATES};
use crate::error::{Error, Result};
use crate::outcome::ScenarioOutcome;
use crate::queue::ActionQueue;
use crate::scheduler::ActionScheduler;
use serde::{Deserialize, Serialize};
use stake_ledger::{Day, LedgerConfig, StakeLedger, FIRST_DAY};
use tracing::info;

/// Number of queue entries that share a day before the day moves on.
pub const DEFAULT_BATCH_SIZE: usize = 150;

/// The four inputs of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Number of stakers, named `user1..userN`.
    pub stakers: usize,
    /// Number of days to simulate.
    pub duration: Day,
    /// Stake actions per staker.
    pub stake_rounds: usize,
    /// Unstake actions per staker.
    pub unstake_rounds: usize,
}

impl ScenarioParams {
    /// Creates a parameter set.
    pub const fn new(
        stakers: usize,
        duration: Day,
        stake_rounds: usize,
        unstake_rounds: usize,
    ) -> Self {
        Self {
            stakers,
            duration,
            stake_rounds,
            unstake_rounds,
        }
    }

    /// Total number of generated actions.
    pub fn total_actions(&self) -> Option<usize> {
        self.stake_rounds
            .checked_add(self.unstake_rounds)
            .and_then(|rounds| rounds.checked_mul(self.stakers))
    }

    /// Checks the parameters describe a runnable scenario.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] for a zero duration or an action count
    /// that does not fit in memory.
    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(Error::InvalidParams("duration must be at least one day".into()));
        }
        if self.total_actions().is_none() {
            return Err(Error::InvalidParams(format!(
                "{} stakers x {} rounds overflows",
                self.stakers,
                self.stake_rounds.saturating_add(self.unstake_rounds)
            )));
        }
        Ok(())
    }

    /// Owner identifiers, `user1` first.
    pub fn owners(&self) -> Vec<String> {
        (1..=self.stakers).map(|i| format!("user{i}")).collect()
    }
}

/// Fixed knobs of scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Ledger configuration for each run.
    pub ledger: LedgerConfig,
    /// Stake templates, cycled by round.
    pub templates: Vec<StakeTemplate>,
    /// Queue entries per day batch.
    pub batch_size: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            templates: DEFAULT_TEMPLATES.to_vec(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScenarioConfig {
    /// Sets the ledger configuration.
    #[must_use]
    pub fn with_ledger(mut self, ledger: LedgerConfig) -> Self {
        self.ledger = ledger;
        self
    }

    /// Sets the template catalog.
    #[must_use]
    pub fn with_templates(mut self, templates: Vec<StakeTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Builds the action queue for a scenario and runs it.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    params: ScenarioParams,
    config: ScenarioConfig,
}

impl ScenarioGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the parameters fail validation, the
    /// catalog is empty, or the batch size is zero.
    pub fn new(params: ScenarioParams, config: ScenarioConfig) -> Result<Self> {
        params.validate()?;
        if config.templates.is_empty() {
            return Err(Error::InvalidParams("template catalog is empty".into()));
        }
        if config.batch_size == 0 {
            return Err(Error::InvalidParams("batch size must be positive".into()));
        }
        Ok(Self { params, config })
    }

    /// Creates a generator with the stock configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the parameters fail validation.
    pub fn with_defaults(params: ScenarioParams) -> Result<Self> {
        Self::new(params, ScenarioConfig::default())
    }

    /// Scenario parameters.
    pub const fn params(&self) -> &ScenarioParams {
        &self.params
    }

    /// Builds the initial action queue.
    ///
    /// Entries are stamped with a running day. The day moves forward by
    /// `max(1, duration / total_actions)` whenever the batch counter hits a
    /// multiple of the batch size. The counter restarts at every stake round
    /// but runs on through the unstake rounds.
    pub fn build_queue(&self) -> ActionQueue {
        let params = &self.params;
        let mut queue = ActionQueue::new(params.duration);

        let total = params.total_actions().unwrap_or(0);
        if total == 0 {
            return queue;
        }

        let interval = (params.duration / Day::try_from(total).unwrap_or(Day::MAX)).max(1);
        let catalog = self.config.templates.len();
        let batch = self.config.batch_size;
        let owners = params.owners();

        let mut day = FIRST_DAY;
        let mut counter = 1;
        let tick = |counter: &mut usize, day: &mut Day| {
            if *counter % batch == 0 {
                *day = day.saturating_add(interval);
            }
            *counter += 1;
        };

        for round in 0..params.stake_rounds {
            counter = 1;
            for owner in &owners {
                queue.push(day, Action::stake(owner.clone(), round % catalog));
                tick(&mut counter, &mut day);
            }
        }
        for round in 0..params.unstake_rounds {
            for owner in &owners {
                queue.push(day, Action::unstake(owner.clone(), round % catalog));
                tick(&mut counter, &mut day);
            }
        }

        queue
    }

    /// Generates the queue and runs it against a fresh ledger.
    ///
    /// # Errors
    ///
    /// Propagates scheduler errors.
    pub fn run(&self) -> Result<ScenarioOutcome> {
        let queue = self.build_queue();
        info!(
            stakers = self.params.stakers,
            duration = self.params.duration,
            queued = queue.len(),
            beyond_horizon = queue.dropped(),
            "scenario generated"
        );

        let ledger = StakeLedger::new(self.config.ledger.clone());
        ActionScheduler::new(ledger, queue, self.config.templates.clone()).run()
    }
}

/// Runs a scenario with the stock configuration.
///
/// # Errors
///
/// Returns [`Error::InvalidParams`] for invalid parameters.
pub fn simulate(params: ScenarioParams) -> Result<ScenarioOutcome> {
    ScenarioGenerator::with_defaults(params)?.run()
}
