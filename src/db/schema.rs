// Database schema — table creation.
//
// The table shape predates this crate: deployments already have a
// `solves.db` with exactly these columns, so it must stay compatible.

use rusqlite::Connection;

use crate::error::StorageError;

/// Create the announced-solves table if it doesn't exist yet.
///
/// Idempotent — safe to call on every startup. There is deliberately no
/// UNIQUE constraint on challenge_id; uniqueness is enforced by the
/// announcer's in-memory check before every insert.
pub fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS announced_solves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            challenge_id INTEGER,              -- CTFd challenge id
            solver_id INTEGER                  -- CTFd account id of the first blood
        );
        ",
    )?;
    Ok(())
}

/// Count the number of tables in the database.
#[cfg(test)]
pub fn table_count(conn: &Connection) -> Result<i64, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
