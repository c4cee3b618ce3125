//! Run command implementation.

use crate::OutputFormat;
use anyhow::{Context, Result};
use stake_scenario::{simulate, ScenarioParams};
use tracing::info;

/// Runs the run command.
pub fn run(params: ScenarioParams, format: OutputFormat, status: bool) -> Result<()> {
    info!(
        "Simulating {} stakers over {} days ({} stake / {} unstake rounds)",
        params.stakers, params.duration, params.stake_rounds, params.unstake_rounds
    );

    let outcome = simulate(params).with_context(|| "Scenario failed")?;

    info!(
        "Dispatched {} actions, deferred {}, dropped {}",
        outcome.stats.dispatched, outcome.stats.deferred, outcome.stats.dropped
    );

    if status {
        eprintln!("{}", outcome.status);
    }

    match format {
        OutputFormat::Line => println!("{outcome}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.report())
                .with_context(|| "Failed to serialize report")?;
            println!("{json}");
        }
    }

    Ok(())
}
