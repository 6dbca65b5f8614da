use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use disksentry::application::config::AppConfig;
use disksentry::application::services::monitor::MonitorService;
use disksentry::domain::policy::RemediationPolicy;
use disksentry::infrastructure::backup::commands::SystemVolumeCommands;
use disksentry::infrastructure::backup::executor::MountBackupExecutor;
use disksentry::infrastructure::collectors::df::DfReporter;
use disksentry::infrastructure::collectors::smartctl::SmartctlSource;
use disksentry::infrastructure::persistence::sqlite_store::SqliteStore;
use disksentry::infrastructure::scoring::forest_scorer::IsolationForestScorer;
use disksentry::presentation::cli::app::{Cli, Commands};
use disksentry::presentation::cli::commands::daemon::run_daemon;
use disksentry::presentation::cli::commands::report::run_report;
use disksentry::presentation::cli::commands::scan::run_scan;

fn print_banner() {
    println!("{}", "━".repeat(44).cyan());
    println!("{}", "  DISKSENTRY — Disk Health Monitor".bold().cyan());
    println!("{}", "━".repeat(44).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::new(&config.database_path)?;
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration; a missing file becomes documented defaults,
    // anything malformed is fatal at startup.
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_or_create(path)?
    } else {
        AppConfig::load()?
    };

    // Manual DI — main.rs is the only place that knows concrete types
    let telemetry = SmartctlSource::new();
    let scorer = IsolationForestScorer::default();
    let policy = RemediationPolicy::new(
        config.backup_threshold,
        config.backup_cooldown_secs.map(Duration::from_secs),
    );
    let commands = SystemVolumeCommands::new(Duration::from_secs(config.copy_timeout_secs));
    let mount_point = shellexpand::tilde(&config.backup_mount_point).to_string();
    let executor = MountBackupExecutor::new(&commands, mount_point);
    let backup_root = shellexpand::tilde(&config.backup_location).to_string();

    match cli.command {
        Some(Commands::Report { json }) => {
            let store = open_store(&config)?;
            let reporter = DfReporter::new();
            run_report(&store, &reporter, &config.monitored_disks, json)?;
        }
        Some(Commands::Scan) => {
            let store = open_store(&config)?;
            let service = MonitorService::new(
                &telemetry,
                &store,
                &store,
                &scorer,
                &policy,
                &executor,
                &config.monitored_disks,
                backup_root,
            );
            run_scan(&service).await?;
        }
        Some(Commands::Daemon) | None => {
            let store = open_store(&config)?;
            print_banner();
            tracing::info!(
                "monitoring {} device(s), threshold {:.2}",
                config.monitored_disks.len(),
                policy.threshold()
            );
            let service = MonitorService::new(
                &telemetry,
                &store,
                &store,
                &scorer,
                &policy,
                &executor,
                &config.monitored_disks,
                backup_root,
            );
            run_daemon(&service, config.smart_check_interval).await?;
        }
    }

    Ok(())
}
