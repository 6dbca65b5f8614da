use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::backup::BackupRun;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("cannot prepare backup destination: {0}")]
    Storage(String),
    #[error("mount failed: {0}")]
    Mount(String),
    #[error("copy failed: {0}")]
    Copy(String),
}

/// Runs the protective backup sequence for one device.
#[async_trait]
pub trait BackupExecutor: Send + Sync {
    /// Mount `device`, copy its full contents into a fresh timestamped
    /// directory under `backup_root`, and unmount.
    ///
    /// Never propagates an error: every failure is folded into the
    /// returned run's outcome so the monitor loop can log and continue.
    async fn run(&self, device: &str, backup_root: &Path) -> BackupRun;
}
