//! jrefresh CLI
//!
//! Replays pull-to-refresh scenarios against a headless `RefreshLayout` and
//! reports whether every assertion held.
//!
//! ```text
//! jrefresh run scenarios/pull_to_refresh.json --config refresh.toml --report out/report.json
//! jrefresh config > refresh.toml
//! ```

mod assert;
mod report;
mod runner;
mod scenario;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jrefresh_core::RefreshConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::runner::{run_scenario, RunOptions};
use crate::scenario::Scenario;

/// Headless pull-to-refresh scenario runner
#[derive(Parser, Debug)]
#[command(name = "jrefresh")]
#[command(about = "Replay pull-to-refresh scenarios headlessly")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a JSON scenario and report the outcome
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Refresh config (TOML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report here (relative path) instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Simulated frame duration in milliseconds
        #[arg(long, default_value = "16")]
        tick_ms: u64,
    },

    /// Print the default config as TOML
    Config,
}

fn main() -> Result<()> {
    // Initialize logging; keep stdout for reports
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            report,
            tick_ms,
        } => cmd_run(scenario, config, report, tick_ms),
        Commands::Config => {
            let text = toml::to_string_pretty(&RefreshConfig::default())?;
            print!("{text}");
            Ok(())
        }
    }
}

fn cmd_run(
    scenario_path: PathBuf,
    config_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    tick_ms: u64,
) -> Result<()> {
    let config = match config_path {
        Some(path) => RefreshConfig::from_path(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RefreshConfig::default(),
    };
    let scenario = Scenario::from_path(&scenario_path)
        .with_context(|| format!("Failed to load scenario {}", scenario_path.display()))?;

    tracing::info!(
        "Running {} ({} steps)",
        scenario_path.display(),
        scenario.steps.len()
    );
    let report = run_scenario(&scenario, config, RunOptions { tick_ms })?;

    match report_path {
        Some(path) => {
            report.write_to_path(&path)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    if report.is_failed() {
        bail!(
            "Scenario failed at step {}: {}",
            report.failed_step_index.unwrap_or_default(),
            report.message.as_deref().unwrap_or("assertion failed")
        );
    }
    tracing::info!(
        "Scenario passed: {} frames, {}ms, {} refreshes",
        report.summary.elapsed_frames,
        report.summary.elapsed_ms,
        report.summary.refresh_count
    );
    Ok(())
}
