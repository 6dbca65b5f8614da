use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandFailure {
    #[error("command not found: {0}")]
    NotFound(String),
    #[error("command failed: {0}")]
    Failed(String),
    #[error("command timed out after {0}s")]
    Timeout(u64),
    /// The copy finished but some individual files could not be read.
    #[error("copy incomplete: {0}")]
    Partial(String),
}

/// The narrow interface to the external mount/copy/unmount commands.
///
/// Mount and copy are async so callers can bound them with timeouts;
/// unmount is synchronous because it must also be callable from a drop
/// guard on panic and cancellation paths.
#[async_trait]
pub trait VolumeCommands: Send + Sync {
    /// Mount `device` at `mount_point`.
    async fn mount(&self, device: &str, mount_point: &Path) -> Result<(), CommandFailure>;

    /// Recursively copy the mounted tree at `source` into `destination`,
    /// preserving attributes.
    async fn copy(&self, source: &Path, destination: &Path) -> Result<(), CommandFailure>;

    /// Unmount whatever is mounted at `mount_point`.
    fn unmount(&self, mount_point: &Path) -> Result<(), CommandFailure>;
}
