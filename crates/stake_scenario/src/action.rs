//! Pending stake and unstake actions.

use serde::{Deserialize, Serialize};
use stake_ledger::Tier;
use std::fmt;

/// What an action does when dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Open a new stake from a template.
    Stake,
    /// Close the owner's oldest open stake.
    Unstake,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stake => write!(f, "stake"),
            Self::Unstake => write!(f, "unstake"),
        }
    }
}

/// An action waiting in the scheduler queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    /// Stake or unstake.
    pub kind: ActionKind,
    /// Owner the action belongs to.
    pub owner: String,
    /// Template catalog index. For unstakes this only gates dispatch: the
    /// owner must hold more open stakes than this index.
    pub template: usize,
}

impl Action {
    /// Creates a stake action.
    pub fn stake(owner: impl Into<String>, template: usize) -> Self {
        Self {
            kind: ActionKind::Stake,
            owner: owner.into(),
            template,
        }
    }

    /// Creates an unstake action.
    pub fn unstake(owner: impl Into<String>, template: usize) -> Self {
        Self {
            kind: ActionKind::Unstake,
            owner: owner.into(),
            template,
        }
    }
}

/// Amount and tier used when a stake action is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeTemplate {
    /// Principal in base units.
    pub amount: u64,
    /// Lock-up tier.
    pub tier: Tier,
}

impl StakeTemplate {
    /// Creates a template.
    pub const fn new(amount: u64, tier: Tier) -> Self {
        Self { amount, tier }
    }
}

/// Stock template catalog, selected by `round % 4`.
pub const DEFAULT_TEMPLATES: [StakeTemplate; 4] = [
    StakeTemplate::new(10_000_000_000, Tier::Year),
    StakeTemplate::new(20_000_000_000, Tier::Quarter),
    StakeTemplate::new(30_000_000_000, Tier::HalfYear),
    StakeTemplate::new(20_000_000_000, Tier::Year),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_log_format() {
        assert_eq!(ActionKind::Stake.to_string(), "stake");
        assert_eq!(ActionKind::Unstake.to_string(), "unstake");
    }

    #[test]
    fn stock_catalog() {
        let tiers: Vec<u8> = DEFAULT_TEMPLATES.iter().map(|t| t.tier.index()).collect();
        assert_eq!(tiers, vec![3, 1, 2, 3]);
        assert_eq!(DEFAULT_TEMPLATES[0].amount, 10_000_000_000);
    }
}
