use rusqlite::Connection;

/// Initialize the database schema, creating tables if they don't exist.
///
/// The column layout of `smart_data` and `disk_predictions` is an external
/// contract — tools inspect the history directly — so it must not change
/// without a migration story.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS smart_data (
            timestamp   TEXT    NOT NULL,
            device      TEXT    NOT NULL,
            attribute   TEXT    NOT NULL,
            value       INTEGER NOT NULL,
            threshold   INTEGER NOT NULL,
            raw_value   TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS disk_predictions (
            timestamp             TEXT NOT NULL,
            device                TEXT NOT NULL,
            health_score          REAL NOT NULL,
            prediction_confidence REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_smart_data_device_timestamp
            ON smart_data(device, timestamp);
        CREATE INDEX IF NOT EXISTS idx_disk_predictions_device_timestamp
            ON disk_predictions(device, timestamp);",
    )?;
    Ok(())
}
