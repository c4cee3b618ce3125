//! Verify command implementation.

use anyhow::{Context, Result};
use stake_scenario::{ScenarioGenerator, ScenarioParams};
use tracing::{error, info};

/// Runs the verify command.
pub fn run(params: ScenarioParams, runs: usize) -> Result<()> {
    let generator =
        ScenarioGenerator::with_defaults(params).with_context(|| "Invalid scenario parameters")?;
    let runs = runs.max(2);

    let mut fingerprints = Vec::with_capacity(runs);
    for attempt in 1..=runs {
        let outcome = generator
            .run()
            .with_context(|| format!("Run {attempt} failed"))?;
        let fingerprint = outcome.fingerprint();
        info!("Run {}: {:016x}", attempt, fingerprint);
        fingerprints.push(fingerprint);
    }

    let first = fingerprints[0];
    if let Some(pos) = fingerprints.iter().position(|f| *f != first) {
        error!(
            "Run {} diverged: {:016x} != {:016x}",
            pos + 1,
            fingerprints[pos],
            first
        );
        anyhow::bail!("Scenario output is not deterministic");
    }

    println!("{first:016x}");
    info!("All {} runs produced identical output", runs);
    Ok(())
}
