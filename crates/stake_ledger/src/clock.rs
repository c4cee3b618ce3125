//! Simulated calendar.
//!
//! A day ends with exactly one distribution pass. A stake created on day `d`
//! therefore receives its first reward when day `d` closes.

use crate::ledger::{Distribution, StakeLedger};
use crate::Day;
use tracing::trace;

/// Something whose clock moves forward one simulated day at a time.
pub trait DayAdvancer {
    /// Current simulated day.
    fn current_day(&self) -> Day;

    /// Runs one distribution pass and moves the clock to the next day.
    fn simulate_day(&mut self) -> Distribution;

    /// Simulates days until the clock reads `day`. No-op if already there or past it.
    fn advance_to(&mut self, day: Day) -> usize {
        let mut simulated = 0;
        while self.current_day() < day {
            self.simulate_day();
            simulated += 1;
        }
        simulated
    }
}

impl DayAdvancer for StakeLedger {
    fn current_day(&self) -> Day {
        Self::current_day(self)
    }

    fn simulate_day(&mut self) -> Distribution {
        let distribution = self.calculate_rewards();
        trace!(day = Self::current_day(self), applied = distribution.is_applied(), "day closed");
        self.close_day();
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerConfig;
    use crate::tier::Tier;
    use bigdecimal::BigDecimal;

    #[test]
    fn simulate_day_moves_clock_by_one() {
        let mut ledger = StakeLedger::default();
        assert_eq!(DayAdvancer::current_day(&ledger), 1);
        assert_eq!(ledger.simulate_day(), Distribution::Skipped);
        assert_eq!(DayAdvancer::current_day(&ledger), 2);
    }

    #[test]
    fn advance_to_counts_days() {
        let mut ledger = StakeLedger::new(LedgerConfig::default().with_starting_day(5));
        assert_eq!(ledger.advance_to(9), 4);
        assert_eq!(ledger.advance_to(3), 0);
        assert_eq!(DayAdvancer::current_day(&ledger), 9);
    }

    #[test]
    fn stake_earns_when_its_creation_day_closes() {
        let mut ledger = StakeLedger::default();
        let id = ledger.add_stake("alice", BigDecimal::from(100), Tier::Quarter);
        assert_eq!(ledger.stake(id).unwrap().amount, BigDecimal::from(100));

        assert!(ledger.simulate_day().is_applied());
        assert!(ledger.stake(id).unwrap().amount > BigDecimal::from(100));
    }
}
