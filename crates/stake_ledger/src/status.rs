//! Point-in-time snapshot of a ledger for reports.

use crate::ledger::StakeLedger;
use crate::stake::{Stake, StakeId};
use crate::tier::Tier;
use crate::Day;
use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places shown in reports.
const REPORT_SCALE: i64 = 4;

fn fixed(value: &BigDecimal) -> String {
    value.with_scale_round(REPORT_SCALE, RoundingMode::HalfEven).to_string()
}

/// One stake as it appears in a status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeStatus {
    /// Arena handle.
    pub id: StakeId,
    /// Owner identifier.
    pub owner: String,
    /// Lock-up tier.
    pub tier: Tier,
    /// Principal, fixed to four decimals.
    pub amount: String,
    /// Side-accrued rewards, fixed to four decimals.
    pub accrued: String,
    /// Payout if unstaked now, fixed to four decimals.
    pub value: String,
}

/// Snapshot of every live stake and the aggregate weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStatus {
    /// Ledger day of the snapshot.
    pub day: Day,
    /// Live stakes in creation order.
    pub stakes: Vec<StakeStatus>,
    /// Aggregate weighted stake, fixed to four decimals.
    pub aggregate: String,
}

impl StakeLedger {
    /// Takes a snapshot for reporting.
    pub fn status(&self) -> LedgerStatus {
        let ctx = self.context();
        let stake_status = |stake: &Stake| StakeStatus {
            id: stake.id,
            owner: stake.owner.clone(),
            tier: stake.tier,
            amount: fixed(&stake.amount),
            accrued: fixed(&stake.accrued),
            value: fixed(&stake.value(ctx)),
        };

        LedgerStatus {
            day: self.current_day(),
            stakes: self.stakes().map(stake_status).collect(),
            aggregate: fixed(self.aggregate()),
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Day {}", self.day)?;
        for stake in &self.stakes {
            if stake.tier.is_compounding() {
                writeln!(
                    f,
                    "{}: {} (x{})",
                    stake.owner,
                    stake.amount,
                    stake.tier.multiplier()
                )?;
            } else {
                writeln!(
                    f,
                    "{}: {} = {} (x1) + {}",
                    stake.owner, stake.value, stake.amount, stake.accrued
                )?;
            }
        }
        write!(f, "Total weighted stake: {}", self.aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DayAdvancer;
    use crate::ledger::LedgerConfig;

    fn sample_ledger() -> StakeLedger {
        let mut ledger =
            StakeLedger::new(LedgerConfig::default().with_daily_budget(BigDecimal::from(400)));
        ledger.add_stake("alice", BigDecimal::from(100), Tier::Flexible);
        ledger.add_stake("bob", BigDecimal::from(100), Tier::YearBoosted);
        ledger.simulate_day();
        ledger
    }

    #[test]
    fn status_lists_live_stakes() {
        let status = sample_ledger().status();
        assert_eq!(status.day, 2);
        assert_eq!(status.stakes.len(), 2);
        assert_eq!(status.stakes[0].accrued, "100.0000");
        assert_eq!(status.stakes[1].amount, "400.0000");
        assert_eq!(status.aggregate, "1300.0000");
    }

    #[test]
    fn status_display() {
        insta::assert_snapshot!(sample_ledger().status().to_string(), @r"
        Day 2
        alice: 200.0000 = 100.0000 (x1) + 100.0000
        bob: 400.0000 (x3)
        Total weighted stake: 1300.0000
        ");
    }

    #[test]
    fn status_serializes_decimals_as_strings() {
        let json = serde_json::to_value(sample_ledger().status()).unwrap();
        assert_eq!(json["stakes"][1]["tier"], "year_boosted");
        assert_eq!(json["aggregate"], "1300.0000");
    }
}
