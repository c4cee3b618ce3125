//! Tiered staking ledger with exact pro-rata daily rewards.
//!
//! This crate provides:
//! - A fixed lock-up tier table with reward multipliers
//! - An explicit decimal context that rounds every operation
//! - The stake ledger and its daily distribution pass
//! - A simulated calendar that closes one day at a time
//!
//! # Example
//!
//! ```rust,ignore
//! use stake_ledger::{DayAdvancer, StakeLedger, Tier};
//!
//! let mut ledger = StakeLedger::default();
//! ledger.add_stake("user1", 10_000_000_000i64.into(), Tier::Year);
//! ledger.simulate_day();
//! println!("{}", ledger.status());
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod clock;
pub mod decimal;
pub mod error;
pub mod ledger;
pub mod stake;
pub mod status;
pub mod tier;

/// Simulated day number.
pub type Day = u64;

pub use clock::DayAdvancer;
pub use decimal::{floor_to_integer, DecimalContext};
pub use error::{Error, Result};
pub use ledger::{Distribution, LedgerConfig, StakeLedger, DAILY_BUDGET, FIRST_DAY};
pub use stake::{Stake, StakeId};
pub use status::{LedgerStatus, StakeStatus};
pub use tier::Tier;
