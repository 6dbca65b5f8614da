use std::sync::Mutex;

use crate::domain::entities::health::HealthRecord;
use crate::domain::entities::snapshot::TelemetrySnapshot;
use crate::domain::ports::store::{AttributeRow, HealthStore, SnapshotStore, StoreError};

/// In-memory store for testing purposes.
pub struct InMemoryStore {
    snapshots: Mutex<Vec<TelemetrySnapshot>>,
    health: Mutex<Vec<HealthRecord>>,
}

impl InMemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshots: Mutex::new(Vec::new()),
            health: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored snapshots for `device`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lock is poisoned.
    pub fn snapshot_count(&self, device: &str) -> Result<usize, StoreError> {
        Ok(self
            .snapshots
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .iter()
            .filter(|s| s.device == device)
            .count())
    }

    /// Number of stored health records for `device`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lock is poisoned.
    pub fn health_count(&self, device: &str) -> Result<usize, StoreError> {
        Ok(self
            .health
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .iter()
            .filter(|r| r.device == device)
            .count())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemoryStore {
    fn append_snapshot(&self, snapshot: &TelemetrySnapshot) -> Result<(), StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?
            .push(snapshot.clone());
        Ok(())
    }

    fn recent_attributes(
        &self,
        device: &str,
        limit: usize,
    ) -> Result<Vec<AttributeRow>, StoreError> {
        let snapshots = self
            .snapshots
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let mut rows = Vec::new();
        for snapshot in snapshots.iter().rev().filter(|s| s.device == device) {
            for attribute in &snapshot.attributes {
                if rows.len() >= limit {
                    return Ok(rows);
                }
                rows.push(AttributeRow {
                    timestamp: snapshot.timestamp,
                    name: attribute.name.clone(),
                    value: attribute.value,
                    threshold: attribute.threshold,
                    raw_value: attribute.raw_value.clone(),
                });
            }
        }
        Ok(rows)
    }
}

impl HealthStore for InMemoryStore {
    fn append_health(&self, record: &HealthRecord) -> Result<(), StoreError> {
        self.health
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?
            .push(record.clone());
        Ok(())
    }

    fn latest_health(&self, device: &str) -> Result<Option<HealthRecord>, StoreError> {
        Ok(self
            .health
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .iter()
            .rev()
            .find(|r| r.device == device)
            .cloned())
    }
}
