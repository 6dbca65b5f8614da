use thiserror::Error;

use crate::domain::entities::space::SpaceUsage;

#[derive(Error, Debug)]
pub enum SpaceError {
    #[error("failed to run space reporter: {0}")]
    ToolUnavailable(String),
    #[error("device not recognized by space reporter: {0}")]
    DeviceUnknown(String),
}

/// Reports filesystem space usage for a device.
pub trait SpaceReporter: Send + Sync {
    /// Query current space usage for `device`.
    ///
    /// # Errors
    ///
    /// Returns `SpaceError` if the reporting tool cannot run or does not
    /// recognize the device (not mounted, not a filesystem).
    fn space_usage(&self, device: &str) -> Result<SpaceUsage, SpaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_error_display() {
        let err = SpaceError::DeviceUnknown("/dev/sdz".to_string());
        assert_eq!(
            err.to_string(),
            "device not recognized by space reporter: /dev/sdz"
        );
    }
}
