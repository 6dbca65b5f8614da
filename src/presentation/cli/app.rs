use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// disksentry — predictive disk health monitor
///
/// Samples SMART diagnostics on an interval, scores device health with
/// anomaly detection over each device's own history, and triggers a
/// protective backup when the score crosses the danger threshold.
#[derive(Parser, Debug)]
#[command(name = "disksentry")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the monitoring daemon
    #[command(alias = "d")]
    Daemon,

    /// Run a single monitoring cycle and exit
    #[command(alias = "sc")]
    Scan,

    /// Print a health report for all monitored disks
    #[command(alias = "r")]
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
