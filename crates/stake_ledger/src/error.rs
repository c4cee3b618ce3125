//! Error types for ledger operations.

use crate::Day;
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Every variant returned from a ledger method guarantees that the ledger was
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Tier index outside the fixed tier table.
    #[error("unknown tier index: {0}")]
    UnknownTier(u8),

    /// Decimal precision must be at least one significant digit.
    #[error("invalid decimal precision: {0}")]
    InvalidPrecision(u64),

    /// The owner holds no live stake at this ordinal.
    #[error("no stake #{ordinal} for owner {owner}")]
    StakeNotFound {
        /// Owner that was addressed.
        owner: String,
        /// Zero-based ordinal among the owner's live stakes.
        ordinal: usize,
    },

    /// The stake is still inside its lock period.
    #[error("stake of {owner} is locked until day {unlocks_on} (current day {current_day})")]
    StakeLocked {
        /// Owner of the locked stake.
        owner: String,
        /// First day on which the ledger accepts the unstake.
        unlocks_on: Day,
        /// Ledger day at the time of the attempt.
        current_day: Day,
    },
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;
