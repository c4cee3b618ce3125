//! Canonical action log.
//!
//! Each dispatched action renders as `day|kind|owner|amount|tier`; unstakes
//! always render amount and tier as `0`. Entries are joined with commas.

use crate::action::ActionKind;
use serde::{Deserialize, Serialize};
use stake_ledger::{Day, Tier};
use std::fmt;

/// One dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Day the action took effect.
    pub day: Day,
    /// Stake or unstake.
    pub kind: ActionKind,
    /// Owner of the stake.
    pub owner: String,
    /// Staked amount in base units; zero for unstakes.
    pub amount: u64,
    /// Tier index; zero for unstakes.
    pub tier: u8,
}

impl LogEntry {
    /// Entry for a stake that was opened.
    pub fn stake(day: Day, owner: impl Into<String>, amount: u64, tier: Tier) -> Self {
        Self {
            day,
            kind: ActionKind::Stake,
            owner: owner.into(),
            amount,
            tier: tier.index(),
        }
    }

    /// Entry for a stake that was closed.
    pub fn unstake(day: Day, owner: impl Into<String>) -> Self {
        Self {
            day,
            kind: ActionKind::Unstake,
            owner: owner.into(),
            amount: 0,
            tier: 0,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.day, self.kind, self.owner, self.amount, self.tier
        )
    }
}

/// Dispatched actions in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    /// Creates an empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Entries in dispatch order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns an iterator over entries.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was dispatched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: ActionKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

impl fmt::Display for ActionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
