//! Action scheduling and synthetic scenario generation for stakesim.
//!
//! This crate provides:
//! - A stable day-ordered queue of stake and unstake actions
//! - The scheduler that drains it against a [`stake_ledger::StakeLedger`]
//! - Scenario generation from four integer parameters
//! - The canonical `log/finalAggregate` output and its fingerprint
//!
//! # Example
//!
//! ```rust,ignore
//! use stake_scenario::{simulate, ScenarioParams};
//!
//! let outcome = simulate(ScenarioParams::new(2, 10, 1, 1))?;
//! println!("{outcome}");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod action;
pub mod error;
pub mod generator;
pub mod log;
pub mod outcome;
pub mod queue;
pub mod scheduler;

pub use action::{Action, ActionKind, StakeTemplate, DEFAULT_TEMPLATES};
pub use error::{Error, Result};
pub use generator::{simulate, ScenarioConfig, ScenarioGenerator, ScenarioParams};
pub use log::{ActionLog, LogEntry};
pub use outcome::{RunStats, ScenarioOutcome, ScenarioReport};
pub use queue::ActionQueue;
pub use scheduler::ActionScheduler;
