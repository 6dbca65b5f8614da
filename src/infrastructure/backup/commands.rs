use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::volume::{CommandFailure, VolumeCommands};

/// rsync exit codes meaning "finished, but some files could not be
/// transferred" — the copy is usable, the failures are reported.
const RSYNC_PARTIAL_CODES: &[i32] = &[23, 24];

const DEFAULT_MOUNT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the real `mount`, `rsync` and `umount` binaries.
///
/// Mount and copy are bounded by timeouts and killed on drop so a hung
/// device cannot wedge the monitor loop. Unmount is synchronous: it must
/// be callable from a drop guard and completes quickly or not at all.
pub struct SystemVolumeCommands {
    mount_timeout: Duration,
    copy_timeout: Duration,
}

impl SystemVolumeCommands {
    #[must_use]
    pub const fn new(copy_timeout: Duration) -> Self {
        Self {
            mount_timeout: DEFAULT_MOUNT_TIMEOUT,
            copy_timeout,
        }
    }
}

async fn run_bounded(
    mut command: tokio::process::Command,
    timeout: Duration,
    name: &str,
) -> Result<std::process::Output, CommandFailure> {
    command.kill_on_drop(true);
    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CommandFailure::NotFound(name.to_string()))
        }
        Ok(Err(e)) => Err(CommandFailure::Failed(format!("{name}: {e}"))),
        Err(_) => Err(CommandFailure::Timeout(timeout.as_secs())),
    }
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[async_trait]
impl VolumeCommands for SystemVolumeCommands {
    async fn mount(&self, device: &str, mount_point: &Path) -> Result<(), CommandFailure> {
        let mut command = tokio::process::Command::new("mount");
        command.arg(device).arg(mount_point);
        let output = run_bounded(command, self.mount_timeout, "mount").await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(CommandFailure::Failed(format!(
                "mount {device} exited with {}: {}",
                output.status,
                stderr_of(&output)
            )))
        }
    }

    async fn copy(&self, source: &Path, destination: &Path) -> Result<(), CommandFailure> {
        let mut command = tokio::process::Command::new("rsync");
        // Trailing slash: copy the tree's contents, not the mount dir itself
        command
            .arg("-a")
            .arg(format!("{}/", source.display()))
            .arg(destination);
        let output = run_bounded(command, self.copy_timeout, "rsync").await?;

        if output.status.success() {
            return Ok(());
        }
        match output.status.code() {
            Some(code) if RSYNC_PARTIAL_CODES.contains(&code) => {
                Err(CommandFailure::Partial(format!(
                    "rsync exited with {code}: {}",
                    stderr_of(&output)
                )))
            }
            _ => Err(CommandFailure::Failed(format!(
                "rsync exited with {}: {}",
                output.status,
                stderr_of(&output)
            ))),
        }
    }

    fn unmount(&self, mount_point: &Path) -> Result<(), CommandFailure> {
        let output = std::process::Command::new("umount")
            .arg(mount_point)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandFailure::NotFound("umount".to_string())
                } else {
                    CommandFailure::Failed(format!("umount: {e}"))
                }
            })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(CommandFailure::Failed(format!(
                "umount {} exited with {}: {}",
                mount_point.display(),
                output.status,
                stderr_of(&output)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mount_nonexistent_device_fails() {
        let commands = SystemVolumeCommands::new(Duration::from_secs(60));
        let result = commands
            .mount("/dev/disksentry-test-nonexistent", Path::new("/tmp"))
            .await;
        // Either the binary is missing (CI) or the mount itself fails;
        // both must surface as an error, never a false success.
        assert!(result.is_err());
    }

    #[test]
    fn unmount_unmounted_path_fails() {
        let commands = SystemVolumeCommands::new(Duration::from_secs(60));
        let result = commands.unmount(Path::new("/tmp/disksentry-test-not-mounted"));
        assert!(result.is_err());
    }
}
