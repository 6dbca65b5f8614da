use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attribute::DiagnosticAttribute;

/// All diagnostic attributes read from one device in one monitoring cycle.
///
/// Immutable after creation; the sample store owns it once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub device: String,
    pub timestamp: DateTime<Utc>,
    pub attributes: Vec<DiagnosticAttribute>,
}

impl TelemetrySnapshot {
    /// Build a snapshot stamped with the current time.
    #[must_use]
    pub fn now(device: impl Into<String>, attributes: Vec<DiagnosticAttribute>) -> Self {
        Self {
            device: device.into(),
            timestamp: Utc::now(),
            attributes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn make_snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot::now(
            "/dev/sda",
            vec![
                DiagnosticAttribute {
                    name: "Raw_Read_Error_Rate".into(),
                    value: 100,
                    threshold: 6,
                    raw_value: "0".into(),
                },
                DiagnosticAttribute {
                    name: "Temperature_Celsius".into(),
                    value: 64,
                    threshold: 0,
                    raw_value: "36".into(),
                },
            ],
        )
    }

    #[test]
    fn now_stamps_device_and_attributes() {
        let snapshot = make_snapshot();
        assert_eq!(snapshot.device, "/dev/sda");
        assert_eq!(snapshot.attributes.len(), 2);
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let snapshot = make_snapshot();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let deserialized: TelemetrySnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deserialized, snapshot);
    }

    #[test]
    fn attribute_order_is_preserved() {
        let snapshot = make_snapshot();
        assert_eq!(snapshot.attributes[0].name, "Raw_Read_Error_Rate");
        assert_eq!(snapshot.attributes[1].name, "Temperature_Celsius");
    }
}
