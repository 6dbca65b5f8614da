use serde::{Deserialize, Serialize};

/// Filesystem space usage for a device.
///
/// `total`, `used` and `available` are in whatever block unit the
/// reporting tool emits — treat them as opaque counts, not kilobytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceUsage {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub usage_percent: f64,
}
