use colored::Colorize;

use crate::application::services::monitor::MonitorService;

/// Run a single monitoring cycle and print the outcome.
///
/// # Errors
///
/// Currently infallible; kept fallible for symmetry with the other
/// commands so `main` can `?` uniformly.
pub async fn run_scan(service: &MonitorService<'_>) -> anyhow::Result<()> {
    let result = service.run_once().await;

    let status = if result.devices_failed == 0 {
        "OK".green()
    } else {
        "DEGRADED".yellow()
    };
    println!(
        "{status} — {} device(s) checked, {} failed, {} backup(s) run",
        result.devices_checked, result.devices_failed, result.backups_run
    );
    Ok(())
}
