use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::health::HealthRecord;
use crate::domain::entities::snapshot::TelemetrySnapshot;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

/// One attribute reading as returned by a history query.
///
/// This is the row shape of the `smart_data` table, which is part of the
/// external contract for tools inspecting history directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub value: i64,
    pub threshold: i64,
    pub raw_value: String,
}

/// Append-only store of telemetry snapshots, queryable by recency.
pub trait SnapshotStore: Send + Sync {
    /// Persist every attribute of a snapshot.
    ///
    /// Appends are unconditional: content is never rejected, only
    /// storage-layer failures are reported. A snapshot's rows must land
    /// atomically so concurrent appends for other devices cannot
    /// interleave them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    fn append_snapshot(&self, snapshot: &TelemetrySnapshot) -> Result<(), StoreError>;

    /// The most recent attribute rows for `device`, newest snapshot first,
    /// up to `limit` rows. Unknown devices yield an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails.
    fn recent_attributes(&self, device: &str, limit: usize)
        -> Result<Vec<AttributeRow>, StoreError>;
}

/// Append-only store of health predictions.
pub trait HealthStore: Send + Sync {
    /// Persist a health record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    fn append_health(&self, record: &HealthRecord) -> Result<(), StoreError>;

    /// The most recent health record for `device`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails.
    fn latest_health(&self, device: &str) -> Result<Option<HealthRecord>, StoreError>;
}
