use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::domain::entities::health::HealthRecord;
use crate::domain::entities::snapshot::TelemetrySnapshot;
use crate::domain::ports::store::{AttributeRow, HealthStore, SnapshotStore, StoreError};

use super::migrations;

/// SQLite-backed append-only store for telemetry and health history.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new `SQLite` store at the given path.
    ///
    /// Expands `~`, creates parent directories, opens the connection,
    /// sets WAL mode and pragmas, and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the database cannot be opened
    /// or initialized.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let expanded = shellexpand::tilde(path);
        let db_path = PathBuf::from(expanded.as_ref());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        let conn =
            Connection::open(&db_path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        migrations::initialize_schema(&conn).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn parse_timestamp(text: &str, column: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn parse_attribute_row(row: &rusqlite::Row<'_>) -> Result<AttributeRow, rusqlite::Error> {
    let timestamp: String = row.get(0)?;
    Ok(AttributeRow {
        timestamp: parse_timestamp(&timestamp, 0)?,
        name: row.get(1)?,
        value: row.get(2)?,
        threshold: row.get(3)?,
        raw_value: row.get(4)?,
    })
}

impl SnapshotStore for SqliteStore {
    fn append_snapshot(&self, snapshot: &TelemetrySnapshot) -> Result<(), StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        // One transaction per snapshot so a device's rows land atomically
        // and never interleave with another device's under concurrency.
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let timestamp = snapshot.timestamp.to_rfc3339();
        for attribute in &snapshot.attributes {
            tx.execute(
                "INSERT INTO smart_data (timestamp, device, attribute, value, threshold, raw_value) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    timestamp,
                    snapshot.device,
                    attribute.name,
                    attribute.value,
                    attribute.threshold,
                    attribute.raw_value,
                ],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn recent_attributes(
        &self,
        device: &str,
        limit: usize,
    ) -> Result<Vec<AttributeRow>, StoreError> {
        let limit = i64::try_from(limit).map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let mut stmt = conn
            .prepare(
                "SELECT timestamp, attribute, value, threshold, raw_value \
                 FROM smart_data WHERE device = ?1 \
                 ORDER BY timestamp DESC, rowid ASC LIMIT ?2",
            )
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![device, limit], parse_attribute_row)
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        drop(stmt);
        drop(conn);
        Ok(rows)
    }
}

impl HealthStore for SqliteStore {
    fn append_health(&self, record: &HealthRecord) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        conn.execute(
            "INSERT INTO disk_predictions (timestamp, device, health_score, prediction_confidence) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.timestamp.to_rfc3339(),
                record.device,
                record.health_score,
                record.confidence,
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(())
    }

    fn latest_health(&self, device: &str) -> Result<Option<HealthRecord>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let result = conn.query_row(
            "SELECT timestamp, health_score, prediction_confidence \
             FROM disk_predictions WHERE device = ?1 \
             ORDER BY timestamp DESC, rowid DESC LIMIT 1",
            params![device],
            |row| {
                let timestamp: String = row.get(0)?;
                Ok((timestamp, row.get::<_, f64>(1)?, row.get::<_, f64>(2)?))
            },
        );

        drop(conn);

        match result {
            Ok((timestamp, health_score, confidence)) => {
                let timestamp = parse_timestamp(&timestamp, 0)
                    .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
                Ok(Some(HealthRecord {
                    device: device.to_string(),
                    timestamp,
                    health_score,
                    confidence,
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::ReadFailed(e.to_string())),
        }
    }
}
