use thiserror::Error;

use crate::domain::entities::attribute::DiagnosticAttribute;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to run diagnostics tool: {0}")]
    ToolUnavailable(String),
    #[error("device unreadable: {0}")]
    DeviceUnreadable(String),
}

/// Source of raw SMART diagnostics for a single device.
pub trait TelemetrySource: Send + Sync {
    /// Read the current diagnostic attributes of `device`.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError` if the diagnostics tool cannot run or the
    /// device cannot be read.
    fn get_attributes(&self, device: &str) -> Result<Vec<DiagnosticAttribute>, TelemetryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_error_display() {
        let err = TelemetryError::DeviceUnreadable("/dev/sdz: no such device".to_string());
        assert_eq!(
            err.to_string(),
            "device unreadable: /dev/sdz: no such device"
        );

        let err = TelemetryError::ToolUnavailable("smartctl not found".to_string());
        assert_eq!(
            err.to_string(),
            "failed to run diagnostics tool: smartctl not found"
        );
    }
}
