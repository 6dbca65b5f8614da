use std::path::PathBuf;

use chrono::Utc;

use crate::domain::entities::backup::BackupOutcome;
use crate::domain::entities::health::HealthRecord;
use crate::domain::entities::snapshot::TelemetrySnapshot;
use crate::domain::policy::RemediationPolicy;
use crate::domain::ports::backup::BackupExecutor;
use crate::domain::ports::scorer::HealthScorer;
use crate::domain::ports::store::{HealthStore, SnapshotStore};
use crate::domain::ports::telemetry::TelemetrySource;

/// Scoring window: the model only ever sees this many recent rows.
const HISTORY_WINDOW_ROWS: usize = 1000;

/// Result of a single monitoring cycle across all devices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleResult {
    pub devices_checked: usize,
    pub devices_failed: usize,
    pub backups_run: usize,
}

enum DeviceCycle {
    Completed { backed_up: bool },
    NoAttributes,
}

/// Orchestrates one cycle per device: collect → persist → score → decide →
/// back up. Failures are isolated at the device boundary so one broken
/// device never halts the others.
pub struct MonitorService<'a> {
    telemetry: &'a dyn TelemetrySource,
    snapshot_store: &'a dyn SnapshotStore,
    health_store: &'a dyn HealthStore,
    scorer: &'a dyn HealthScorer,
    policy: &'a RemediationPolicy,
    executor: &'a dyn BackupExecutor,
    devices: &'a [String],
    backup_root: PathBuf,
}

impl<'a> MonitorService<'a> {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        telemetry: &'a dyn TelemetrySource,
        snapshot_store: &'a dyn SnapshotStore,
        health_store: &'a dyn HealthStore,
        scorer: &'a dyn HealthScorer,
        policy: &'a RemediationPolicy,
        executor: &'a dyn BackupExecutor,
        devices: &'a [String],
        backup_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            telemetry,
            snapshot_store,
            health_store,
            scorer,
            policy,
            executor,
            devices,
            backup_root: backup_root.into(),
        }
    }

    /// Run one monitoring cycle over every configured device.
    ///
    /// Never fails: per-device errors are logged with the device identity
    /// and counted, and the remaining devices still run.
    pub async fn run_once(&self) -> CycleResult {
        let mut result = CycleResult::default();

        for device in self.devices {
            match self.check_device(device).await {
                Ok(DeviceCycle::Completed { backed_up }) => {
                    result.devices_checked += 1;
                    if backed_up {
                        result.backups_run += 1;
                    }
                }
                Ok(DeviceCycle::NoAttributes) => {
                    result.devices_checked += 1;
                }
                Err(e) => {
                    tracing::error!(device = %device, "monitoring cycle failed: {e:#}");
                    result.devices_failed += 1;
                }
            }
        }

        result
    }

    async fn check_device(&self, device: &str) -> anyhow::Result<DeviceCycle> {
        let attributes = self.telemetry.get_attributes(device)?;
        if attributes.is_empty() {
            tracing::warn!(device, "no diagnostic attributes returned, skipping");
            return Ok(DeviceCycle::NoAttributes);
        }

        let snapshot = TelemetrySnapshot::now(device, attributes);
        self.snapshot_store.append_snapshot(&snapshot)?;

        let history = self
            .snapshot_store
            .recent_attributes(device, HISTORY_WINDOW_ROWS)?;
        let estimate = self.scorer.score(&history)?;

        let record = HealthRecord {
            device: device.to_string(),
            timestamp: Utc::now(),
            health_score: estimate.health_score,
            confidence: estimate.confidence,
        };
        self.health_store.append_health(&record)?;

        tracing::info!(
            device,
            "health score {:.2}, confidence {:.2}",
            estimate.health_score,
            estimate.confidence
        );

        let mut backed_up = false;
        if self.policy.decide(device, estimate.health_score, Utc::now()) {
            tracing::warn!(
                device,
                "low health score ({:.2}) detected, initiating backup",
                estimate.health_score
            );
            let run = self.executor.run(device, &self.backup_root).await;
            self.policy.note_backup(device, run.started_at);
            match &run.outcome {
                BackupOutcome::Success => {
                    tracing::info!(
                        device,
                        "backup completed successfully to {}",
                        run.destination.display()
                    );
                }
                BackupOutcome::Failed(reason) => {
                    tracing::error!(device, "backup failed: {reason}");
                }
            }
            backed_up = true;
        }

        Ok(DeviceCycle::Completed { backed_up })
    }
}
