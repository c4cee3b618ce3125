//! Drains the action queue against a ledger.
//!
//! The scheduler walks the clock forward to each action's day, dispatches it,
//! and defers unstakes whose target stake is still locked. Unstakes always
//! address the owner's oldest open stake.

use crate::action::{Action, ActionKind, StakeTemplate};
use crate::error::{Error, Result};
use crate::log::{ActionLog, LogEntry};
use crate::outcome::{RunStats, ScenarioOutcome};
use crate::queue::ActionQueue;
use bigdecimal::BigDecimal;
use stake_ledger::{floor_to_integer, Day, DayAdvancer, StakeLedger, Tier};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

/// A stake the scheduler opened and has not closed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenStake {
    day: Day,
    amount: u64,
    tier: Tier,
}

impl OpenStake {
    /// First day a scheduled unstake may close this stake: one day after the
    /// lock period has fully elapsed.
    const fn unlock_day(&self) -> Day {
        self.day + self.tier.lock_days() + 1
    }
}

/// Runs a queue of actions to completion.
#[derive(Debug)]
pub struct ActionScheduler {
    ledger: StakeLedger,
    queue: ActionQueue,
    templates: Vec<StakeTemplate>,
    open: HashMap<String, VecDeque<OpenStake>>,
    log: ActionLog,
    stats: RunStats,
}

impl ActionScheduler {
    /// Creates a scheduler. The queue horizon is the run duration.
    pub fn new(
        ledger: StakeLedger,
        queue: ActionQueue,
        templates: impl Into<Vec<StakeTemplate>>,
    ) -> Self {
        Self {
            ledger,
            queue,
            templates: templates.into(),
            open: HashMap::new(),
            log: ActionLog::new(),
            stats: RunStats::default(),
        }
    }

    /// Last simulated day of the run.
    pub const fn duration(&self) -> Day {
        self.queue.horizon()
    }

    /// Ledger being driven.
    pub const fn ledger(&self) -> &StakeLedger {
        &self.ledger
    }

    /// Actions still pending.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatches every pending action, then closes the remaining days.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTemplate`] if a stake action names a template
    /// outside the catalog.
    pub fn run(mut self) -> Result<ScenarioOutcome> {
        let duration = self.duration();
        info!(duration, pending = self.queue.len(), "scheduler started");

        while self.ledger.current_day() <= duration {
            let Some((target, action)) = self.queue.pop() else {
                break;
            };

            self.advance_to(target.min(duration + 1));
            self.dispatch(action)?;

            if target > self.ledger.current_day() {
                self.close_day();
            }
        }

        self.advance_to(duration + 1);
        self.stats.dropped += self.queue.dropped();

        let aggregate = self.ledger.aggregate().clone();
        info!(
            dispatched = self.log.len(),
            deferred = self.stats.deferred,
            %aggregate,
            "scheduler finished"
        );

        Ok(ScenarioOutcome {
            final_aggregate: floor_to_integer(&aggregate),
            aggregate,
            status: self.ledger.status(),
            log: self.log,
            stats: self.stats,
        })
    }

    fn advance_to(&mut self, day: Day) {
        while self.ledger.current_day() < day {
            self.close_day();
        }
    }

    fn close_day(&mut self) {
        if !self.ledger.simulate_day().is_applied() {
            self.stats.skipped_distributions += 1;
        }
        self.stats.days_simulated += 1;
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        let day = self.ledger.current_day();
        match action.kind {
            ActionKind::Stake => {
                let template = *self
                    .templates
                    .get(action.template)
                    .ok_or(Error::UnknownTemplate(action.template))?;

                self.ledger
                    .add_stake(&action.owner, BigDecimal::from(template.amount), template.tier);
                self.open.entry(action.owner.clone()).or_default().push_back(OpenStake {
                    day,
                    amount: template.amount,
                    tier: template.tier,
                });
                self.log
                    .push(LogEntry::stake(day, action.owner, template.amount, template.tier));
                self.stats.dispatched += 1;
            }
            ActionKind::Unstake => self.dispatch_unstake(day, action),
        }
        Ok(())
    }

    fn dispatch_unstake(&mut self, day: Day, action: Action) {
        let open = self.open.get(&action.owner);
        let open_count = open.map_or(0, VecDeque::len);
        let head = open.and_then(|stakes| stakes.front().copied());

        let Some(head) = head.filter(|_| open_count > action.template) else {
            debug!(
                day,
                owner = %action.owner,
                open_count,
                gate = action.template,
                "unstake dropped"
            );
            self.stats.dropped += 1;
            return;
        };

        let unlock_day = head.unlock_day();
        if day < unlock_day {
            debug!(day, owner = %action.owner, unlock_day, "unstake deferred");
            if self.queue.push(unlock_day, action) {
                self.stats.deferred += 1;
            }
            return;
        }

        match self.ledger.unstake(&action.owner, 0) {
            Ok(value) => {
                if let Some(stakes) = self.open.get_mut(&action.owner) {
                    stakes.pop_front();
                }
                debug!(day, owner = %action.owner, staked = head.amount, %value, "unstaked");
                self.log.push(LogEntry::unstake(day, action.owner));
                self.stats.dispatched += 1;
            }
            Err(err) => {
                warn!(day, %err, "ledger refused unstake");
                self.stats.rejected += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DEFAULT_TEMPLATES;
    use num_bigint::BigInt;
    use stake_ledger::LedgerConfig;

    fn run(duration: Day, actions: Vec<(Day, Action)>) -> ScenarioOutcome {
        run_with_ledger(StakeLedger::default(), duration, actions)
    }

    fn run_with_ledger(
        ledger: StakeLedger,
        duration: Day,
        actions: Vec<(Day, Action)>,
    ) -> ScenarioOutcome {
        let mut queue = ActionQueue::new(duration);
        for (day, action) in actions {
            queue.push(day, action);
        }
        ActionScheduler::new(ledger, queue, DEFAULT_TEMPLATES).run().unwrap()
    }

    fn zero_budget() -> StakeLedger {
        StakeLedger::new(LedgerConfig::default().with_daily_budget(BigDecimal::from(0)))
    }

    #[test]
    fn stake_is_logged_on_its_day() {
        let outcome = run(1, vec![(1, Action::stake("user1", 0))]);
        assert_eq!(outcome.to_string(), "1|stake|user1|10000000000|3/1396246575341");
        assert_eq!(outcome.stats.days_simulated, 1);
    }

    #[test]
    fn clock_advances_to_action_day() {
        let outcome = run(10, vec![(4, Action::stake("alice", 1))]);
        assert_eq!(outcome.log.to_string(), "4|stake|alice|20000000000|1");
        assert_eq!(outcome.stats.days_simulated, 10);
        // days 1-3 had no stakes to reward
        assert_eq!(outcome.stats.skipped_distributions, 3);
    }

    #[test]
    fn unstake_at_lock_end_is_deferred_one_day() {
        // quarter tier locks for 90 days; day 91 is elapsed == lock
        let outcome = run_with_ledger(
            zero_budget(),
            100,
            vec![(1, Action::stake("alice", 1)), (91, Action::unstake("alice", 0))],
        );
        assert_eq!(
            outcome.log.to_string(),
            "1|stake|alice|20000000000|1,92|unstake|alice|0|0"
        );
        assert_eq!(outcome.stats.deferred, 1);
        assert!(outcome.status.stakes.is_empty());
    }

    #[test]
    fn unstake_one_day_after_lock_succeeds_immediately() {
        let outcome = run_with_ledger(
            zero_budget(),
            100,
            vec![(1, Action::stake("alice", 1)), (92, Action::unstake("alice", 0))],
        );
        assert_eq!(
            outcome.log.to_string(),
            "1|stake|alice|20000000000|1,92|unstake|alice|0|0"
        );
        assert_eq!(outcome.stats.deferred, 0);
    }

    #[test]
    fn deferral_past_duration_is_dropped() {
        let outcome = run(
            50,
            vec![(1, Action::stake("alice", 0)), (2, Action::unstake("alice", 0))],
        );
        assert_eq!(outcome.log.len(), 1);
        assert_eq!(outcome.stats.deferred, 0);
        assert_eq!(outcome.stats.dropped, 1);
        assert_eq!(outcome.status.stakes.len(), 1);
    }

    #[test]
    fn unstake_targets_oldest_open_stake() {
        let outcome = run_with_ledger(
            zero_budget(),
            400,
            vec![
                (1, Action::stake("alice", 0)),
                (2, Action::stake("alice", 1)),
                (300, Action::unstake("alice", 0)),
            ],
        );
        // the quarter stake unlocks first, but the year stake is the head
        assert_eq!(
            outcome.log.to_string(),
            "1|stake|alice|10000000000|3,2|stake|alice|20000000000|1,367|unstake|alice|0|0"
        );
        assert_eq!(outcome.status.stakes.len(), 1);
        assert_eq!(outcome.status.stakes[0].tier, Tier::Quarter);
    }

    #[test]
    fn unstake_gate_requires_more_open_stakes_than_index() {
        let outcome = run_with_ledger(
            zero_budget(),
            10,
            vec![(1, Action::stake("alice", 0)), (2, Action::unstake("alice", 1))],
        );
        assert_eq!(outcome.log.len(), 1);
        assert_eq!(outcome.stats.dropped, 1);
        assert_eq!(outcome.stats.deferred, 0);
    }

    #[test]
    fn unstake_without_stakes_is_dropped() {
        let outcome = run(5, vec![(1, Action::unstake("ghost", 0))]);
        assert!(outcome.log.is_empty());
        assert_eq!(outcome.stats.dropped, 1);
        assert_eq!(outcome.final_aggregate, BigInt::from(0));
    }

    #[test]
    fn deferred_unstake_runs_after_same_day_peers() {
        let outcome = run_with_ledger(
            zero_budget(),
            400,
            vec![
                (1, Action::stake("alice", 0)),
                (2, Action::unstake("alice", 0)),
                (367, Action::stake("bob", 2)),
            ],
        );
        assert_eq!(
            outcome.log.to_string(),
            "1|stake|alice|10000000000|3,367|stake|bob|30000000000|2,367|unstake|alice|0|0"
        );
    }

    #[test]
    fn days_after_the_last_unstake_count_as_skipped() {
        let outcome = run(
            400,
            vec![
                (1, Action::stake("alice", 0)),
                (1, Action::stake("bob", 1)),
                (1, Action::stake("carol", 2)),
                (2, Action::unstake("alice", 0)),
                (2, Action::unstake("bob", 0)),
                (2, Action::unstake("carol", 0)),
            ],
        );
        assert_eq!(
            outcome.log.to_string(),
            "1|stake|alice|10000000000|3,1|stake|bob|20000000000|1,1|stake|carol|30000000000|2,\
             92|unstake|bob|0|0,182|unstake|carol|0|0,367|unstake|alice|0|0"
        );
        assert!(outcome.status.stakes.is_empty());
        // days 367 through 400 close on an empty ledger
        assert_eq!(outcome.stats.skipped_distributions, 34);
        assert_eq!(outcome.final_aggregate, BigInt::from(0));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let mut queue = ActionQueue::new(5);
        queue.push(1, Action::stake("alice", 7));
        let err = ActionScheduler::new(StakeLedger::default(), queue, DEFAULT_TEMPLATES)
            .run()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTemplate(7)));
    }

    #[test]
    fn empty_queue_still_closes_every_day() {
        let scheduler =
            ActionScheduler::new(StakeLedger::default(), ActionQueue::new(30), DEFAULT_TEMPLATES);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.duration(), 30);
        assert_eq!(scheduler.ledger().current_day(), 1);

        let outcome = scheduler.run().unwrap();
        assert_eq!(outcome.stats.days_simulated, 30);
        assert_eq!(outcome.stats.skipped_distributions, 30);
        assert_eq!(outcome.status.day, 31);
        assert_eq!(outcome.to_string(), "/0");
    }
}
