use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::backup::{BackupOutcome, BackupRun};
use crate::domain::ports::backup::{BackupError, BackupExecutor};
use crate::domain::ports::volume::{CommandFailure, VolumeCommands};

/// Unmounts on drop unless explicitly released.
///
/// Covers the paths sequential code cannot: panics, and the daemon's
/// shutdown signal cancelling the cycle future mid-copy. The normal and
/// copy-failure paths release explicitly so unmount errors are reported
/// rather than swallowed.
struct MountGuard<'a> {
    commands: &'a dyn VolumeCommands,
    mount_point: &'a Path,
    armed: bool,
}

impl<'a> MountGuard<'a> {
    fn new(commands: &'a dyn VolumeCommands, mount_point: &'a Path) -> Self {
        Self {
            commands,
            mount_point,
            armed: true,
        }
    }

    fn release(mut self) -> Result<(), CommandFailure> {
        self.armed = false;
        self.commands.unmount(self.mount_point)
    }
}

impl Drop for MountGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.commands.unmount(self.mount_point) {
                tracing::warn!(
                    "emergency unmount of {} failed: {e}",
                    self.mount_point.display()
                );
            }
        }
    }
}

/// Backs up a device by mounting it and copying the full tree into a
/// fresh timestamped directory.
pub struct MountBackupExecutor<'a> {
    commands: &'a dyn VolumeCommands,
    mount_point: PathBuf,
}

impl<'a> MountBackupExecutor<'a> {
    #[must_use]
    pub fn new(commands: &'a dyn VolumeCommands, mount_point: impl Into<PathBuf>) -> Self {
        Self {
            commands,
            mount_point: mount_point.into(),
        }
    }

    async fn execute(&self, device: &str, destination: &Path) -> Result<(), BackupError> {
        std::fs::create_dir_all(destination).map_err(|e| {
            BackupError::Storage(format!("create {}: {e}", destination.display()))
        })?;
        std::fs::create_dir_all(&self.mount_point).map_err(|e| {
            BackupError::Storage(format!("create {}: {e}", self.mount_point.display()))
        })?;

        self.commands
            .mount(device, &self.mount_point)
            .await
            .map_err(|e| BackupError::Mount(e.to_string()))?;

        // Mounted: the device must end unmounted on every path from here.
        let guard = MountGuard::new(self.commands, &self.mount_point);

        let copy_result = match self.commands.copy(&self.mount_point, destination).await {
            Ok(()) => Ok(()),
            Err(CommandFailure::Partial(detail)) => {
                tracing::warn!(
                    device,
                    "backup copy finished with per-file failures: {detail}"
                );
                Ok(())
            }
            Err(e) => Err(BackupError::Copy(e.to_string())),
        };

        let unmount_result = guard
            .release()
            .map_err(|e| BackupError::Mount(format!("unmount: {e}")));

        // The copy failure is the more useful reason when both went wrong
        copy_result?;
        unmount_result?;
        Ok(())
    }
}

#[async_trait]
impl BackupExecutor for MountBackupExecutor<'_> {
    async fn run(&self, device: &str, backup_root: &Path) -> BackupRun {
        let started_at = Utc::now();
        let destination =
            backup_root.join(format!("backup_{}", started_at.format("%Y%m%d_%H%M%S")));

        let outcome = match self.execute(device, &destination).await {
            Ok(()) => BackupOutcome::Success,
            Err(e) => BackupOutcome::Failed(e.to_string()),
        };

        BackupRun {
            device: device.to_string(),
            started_at,
            destination,
            outcome,
        }
    }
}
