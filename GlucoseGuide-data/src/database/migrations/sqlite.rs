use rusqlite::Connection;
use tracing::info;

use crate::database::StoreError;

/// Current schema version recorded in `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        info!("SQLite blob store schema is current (version {})", version);
        return Ok(());
    }

    info!("Running SQLite migrations from version {}", version);

    create_kv_store_table(conn)?;
    conn.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .map_err(|e| StoreError::Migration(format!("Failed to record schema version: {}", e)))?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the key/value table
fn create_kv_store_table(conn: &Connection) -> Result<(), StoreError> {
    info!("Creating kv_store table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    ).map_err(|e| StoreError::Migration(format!("Failed to create kv_store: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0)).unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
