//! stakesim CLI - staking reward scenario oracle.
//!
//! Commands:
//! - `stakesim run` - Generate a scenario and print `log/finalAggregate`
//! - `stakesim verify` - Rerun a scenario and check the output never changes

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use stake_scenario::ScenarioParams;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stakesim")]
#[command(about = "Deterministic staking reward simulator and action-log oracle")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// The four scenario inputs, in oracle order.
#[derive(Args, Debug, Clone, Copy)]
struct ScenarioArgs {
    /// Number of stakers (user1..userN)
    stakers: usize,

    /// Number of days to simulate
    duration: u64,

    /// Stake actions per staker
    stake_rounds: usize,

    /// Unstake actions per staker
    unstake_rounds: usize,
}

impl From<ScenarioArgs> for ScenarioParams {
    fn from(args: ScenarioArgs) -> Self {
        Self::new(args.stakers, args.duration, args.stake_rounds, args.unstake_rounds)
    }
}

/// Output format for `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The canonical `log/finalAggregate` line
    Line,
    /// Pretty JSON report
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and run a scenario
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "line")]
        format: OutputFormat,

        /// Print the final ledger status to stderr
        #[arg(long)]
        status: bool,
    },

    /// Rerun a scenario and compare output fingerprints
    Verify {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Number of runs to compare
        #[arg(short, long, default_value_t = 3)]
        runs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the oracle output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            format,
            status,
        } => commands::run::run(scenario.into(), format, status),
        Commands::Verify { scenario, runs } => commands::verify::run(scenario.into(), runs),
    }
}
