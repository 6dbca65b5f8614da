use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Terminal state of a backup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Success,
    Failed(String),
}

impl BackupOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One executor invocation, from destination creation to unmount.
///
/// Not persisted alongside telemetry — the run is an operational side
/// effect reported through logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRun {
    pub device: String,
    pub started_at: DateTime<Utc>,
    pub destination: PathBuf,
    pub outcome: BackupOutcome,
}
