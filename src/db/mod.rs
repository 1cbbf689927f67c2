// Database layer — SQLite storage for announced first bloods.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever FIRSTBLOOD_DB_PATH points
// (defaults to ./solves.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStore;
pub use traits::AnnouncementStore;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::error::StorageError;

/// Open (or create) the database and make sure the table exists.
pub fn initialize(db_path: &str) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(StorageError::from)
                .with_context(|| format!("Failed to create directory for database: {db_path}"))?;
        }
    }

    info!(path = db_path, "Connecting to sqlite3 db");
    let conn = Connection::open(db_path)
        .map_err(StorageError::from)
        .with_context(|| format!("Failed to open database at {db_path}"))?;

    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
        .map_err(StorageError::from)
        .with_context(|| format!("Database at {db_path} is not usable"))?;

    schema::create_tables(&conn)
        .with_context(|| format!("Failed to create tables in {db_path}"))?;

    Ok(conn)
}

/// Open the announcement store at `db_path`, creating it if absent.
pub fn open_store(db_path: &str) -> Result<SqliteStore> {
    Ok(SqliteStore::new(initialize(db_path)?))
}
