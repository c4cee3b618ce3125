//! Error types for scenario operations.

use thiserror::Error;

/// Errors that can occur while building or running a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// Ledger rejected an operation the scheduler relies on.
    #[error(transparent)]
    Ledger(#[from] stake_ledger::Error),

    /// Scenario parameters are outside the supported range.
    #[error("invalid scenario parameters: {0}")]
    InvalidParams(String),

    /// Action refers to a template the catalog does not have.
    #[error("unknown stake template: {0}")]
    UnknownTemplate(usize),
}

/// Result type alias for scenario operations.
pub type Result<T> = std::result::Result<T, Error>;
