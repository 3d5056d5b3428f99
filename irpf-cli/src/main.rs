mod commands;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ComputeCommand, RatesCommand};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Spanish income tax estimator (IRPF + Social Security).
///
/// Estimates the annual IRPF liability and social security contributions
/// for employees and self-employed workers, using the builtin 2024 state
/// and regional bracket schedules or a rate file supplied on the command
/// line.
#[derive(Debug, Parser)]
#[command(name = "irpf")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate tax for one year of income.
    Compute(ComputeCommand),
    /// Print the bracket schedules the estimator applies.
    Rates(RatesCommand),
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Compute(cmd) => cmd.exec(),
        Command::Rates(cmd) => cmd.exec(),
    }
}
