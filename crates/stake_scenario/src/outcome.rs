//! Result of a completed run.

use crate::log::ActionLog;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use stake_ledger::{Day, LedgerStatus};
use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Counters collected while the scheduler drains its queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Actions that changed the ledger.
    pub dispatched: usize,
    /// Unstakes pushed back to their unlock day.
    pub deferred: usize,
    /// Actions discarded: past the horizon, or unstakes failing the open-stake gate.
    pub dropped: usize,
    /// Unstakes the ledger refused after the scheduler considered them due.
    pub rejected: usize,
    /// Days closed by the run.
    pub days_simulated: Day,
    /// Days closed with nothing to distribute to.
    pub skipped_distributions: Day,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Dispatched actions in order.
    pub log: ActionLog,
    /// Aggregate weighted stake at the end of the run.
    pub aggregate: BigDecimal,
    /// `aggregate` floored to an integer.
    pub final_aggregate: BigInt,
    /// Ledger snapshot at the end of the run.
    pub status: LedgerStatus,
    /// Scheduler counters.
    pub stats: RunStats,
}

impl ScenarioOutcome {
    /// The canonical `log/finalAggregate` line.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Hash of the canonical line. Equal fingerprints mean byte-identical output.
    pub fn fingerprint(&self) -> u64 {
        xxh64(self.canonical().as_bytes(), 0)
    }

    /// Serializable summary of the run.
    pub fn report(&self) -> ScenarioReport {
        ScenarioReport {
            canonical: self.canonical(),
            log: self.log.clone(),
            final_aggregate: self.final_aggregate.to_string(),
            aggregate: self.aggregate.to_string(),
            fingerprint: format!("{:016x}", self.fingerprint()),
            stats: self.stats.clone(),
        }
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.log, self.final_aggregate)
    }
}

/// JSON-friendly form of a [`ScenarioOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// The canonical `log/finalAggregate` line.
    pub canonical: String,
    /// Dispatched actions in order.
    pub log: ActionLog,
    /// Floored final aggregate.
    pub final_aggregate: String,
    /// Unfloored final aggregate.
    pub aggregate: String,
    /// Hex xxh64 of the canonical line.
    pub fingerprint: String,
    /// Scheduler counters.
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogEntry;
    use stake_ledger::{StakeLedger, Tier};
    use std::str::FromStr;

    fn outcome() -> ScenarioOutcome {
        let mut log = ActionLog::new();
        log.push(LogEntry::stake(1, "user1", 10_000_000_000, Tier::Year));
        ScenarioOutcome {
            log,
            aggregate: BigDecimal::from_str("1396246575341.2").unwrap(),
            final_aggregate: BigInt::from(1_396_246_575_341_i64),
            status: StakeLedger::default().status(),
            stats: RunStats::default(),
        }
    }

    #[test]
    fn canonical_line() {
        assert_eq!(outcome().canonical(), "1|stake|user1|10000000000|3/1396246575341");
    }

    #[test]
    fn fingerprint_tracks_canonical_bytes() {
        let a = outcome();
        let mut b = outcome();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.final_aggregate += BigInt::from(1);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = outcome().report();
        let json = serde_json::to_string(&report).unwrap();
        let parsed: ScenarioReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
        assert_eq!(parsed.final_aggregate, "1396246575341");
        assert_eq!(parsed.fingerprint.len(), 16);
    }
}
