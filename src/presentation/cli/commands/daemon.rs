use std::time::Duration;

use crate::application::services::monitor::MonitorService;

/// Run the monitoring daemon loop at the configured interval.
///
/// The daemon runs until it receives a SIGINT signal (Ctrl+C) via
/// [`tokio::signal::ctrl_c()`], at which point it shuts down gracefully and
/// returns `Ok(())`. Cancellation is checked between cycles; a cycle in
/// flight when the signal arrives is dropped, and the backup executor's
/// mount guard covers unmount on that path.
///
/// Errors during individual monitoring cycles are logged but do not stop
/// the daemon.
///
/// # Errors
///
/// Returns an error only if signal installation fails at startup.
pub async fn run_daemon(service: &MonitorService<'_>, interval_secs: u64) -> anyhow::Result<()> {
    tracing::info!("daemon started (interval: {interval_secs}s)");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let result = service.run_once().await;
                tracing::info!(
                    "cycle complete: {} device(s) checked, {} failed, {} backup(s) run",
                    result.devices_checked,
                    result.devices_failed,
                    result.backups_run,
                );
            }
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received, exiting");
                println!("\nStopping disksentry...");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::attribute::DiagnosticAttribute;
    use crate::domain::entities::backup::{BackupOutcome, BackupRun};
    use crate::domain::policy::RemediationPolicy;
    use crate::domain::ports::backup::BackupExecutor;
    use crate::domain::ports::scorer::{HealthEstimate, HealthScorer, ScoreError};
    use crate::domain::ports::store::AttributeRow;
    use crate::domain::ports::telemetry::{TelemetryError, TelemetrySource};
    use crate::infrastructure::persistence::in_memory_store::InMemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::path::Path;

    struct MockTelemetry;

    impl TelemetrySource for MockTelemetry {
        fn get_attributes(
            &self,
            _device: &str,
        ) -> Result<Vec<DiagnosticAttribute>, TelemetryError> {
            Ok(vec![DiagnosticAttribute {
                name: "Raw_Read_Error_Rate".into(),
                value: 100,
                threshold: 6,
                raw_value: "0".into(),
            }])
        }
    }

    struct FailingTelemetry;

    impl TelemetrySource for FailingTelemetry {
        fn get_attributes(
            &self,
            device: &str,
        ) -> Result<Vec<DiagnosticAttribute>, TelemetryError> {
            Err(TelemetryError::DeviceUnreadable(device.to_string()))
        }
    }

    struct MockScorer;

    impl HealthScorer for MockScorer {
        fn score(&self, _history: &[AttributeRow]) -> Result<HealthEstimate, ScoreError> {
            Ok(HealthEstimate {
                health_score: 0.9,
                confidence: 0.5,
            })
        }
    }

    struct MockExecutor;

    #[async_trait]
    impl BackupExecutor for MockExecutor {
        async fn run(&self, device: &str, backup_root: &Path) -> BackupRun {
            BackupRun {
                device: device.to_string(),
                started_at: Utc::now(),
                destination: backup_root.join("backup_test"),
                outcome: BackupOutcome::Success,
            }
        }
    }

    #[tokio::test]
    async fn daemon_runs_at_least_one_cycle() {
        let telemetry = MockTelemetry;
        let store = InMemoryStore::new();
        let scorer = MockScorer;
        let policy = RemediationPolicy::new(0.7, None);
        let executor = MockExecutor;
        let devices = vec!["/dev/sda".to_string()];

        let service = MonitorService::new(
            &telemetry, &store, &store, &scorer, &policy, &executor, &devices, "/tmp/backups",
        );

        let result =
            tokio::time::timeout(Duration::from_millis(200), run_daemon(&service, 1)).await;

        // Timeout is expected — the daemon loops until ctrl_c signal
        assert!(result.is_err());
        assert!(store.snapshot_count("/dev/sda").expect("count") >= 1);
    }

    #[tokio::test]
    async fn daemon_handles_cycle_error() {
        let telemetry = FailingTelemetry;
        let store = InMemoryStore::new();
        let scorer = MockScorer;
        let policy = RemediationPolicy::new(0.7, None);
        let executor = MockExecutor;
        let devices = vec!["/dev/sda".to_string()];

        let service = MonitorService::new(
            &telemetry, &store, &store, &scorer, &policy, &executor, &devices, "/tmp/backups",
        );

        let result =
            tokio::time::timeout(Duration::from_millis(200), run_daemon(&service, 1)).await;

        // Timeout expected — daemon continues despite errors
        assert!(result.is_err());
    }
}
