use serde::{Deserialize, Serialize};

/// One named SMART metric read from a device at a point in time.
///
/// `value` and `threshold` are the normalized vendor values; `raw_value`
/// is kept verbatim because its encoding is vendor-specific.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticAttribute {
    pub name: String,
    pub value: i64,
    pub threshold: i64,
    pub raw_value: String,
}
