// Database queries — every SQL statement the announcer runs.

use std::collections::HashSet;

use rusqlite::{params, Connection};

use super::models::AnnouncedRecord;
use crate::error::StorageError;

/// All challenge ids that have ever been announced.
pub fn load_announced(conn: &Connection) -> Result<HashSet<i64>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT challenge_id FROM announced_solves WHERE challenge_id IS NOT NULL",
    )?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<HashSet<_>>>()?;
    Ok(ids)
}

/// Insert one announced first blood and return its row id.
pub fn insert_announced(conn: &Connection, record: &AnnouncedRecord) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO announced_solves (challenge_id, solver_id) VALUES (?1, ?2)",
        params![record.challenge_id, record.solver_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Every stored record, oldest first.
#[cfg(test)]
pub fn list_announced(conn: &Connection) -> Result<Vec<AnnouncedRecord>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT challenge_id, solver_id FROM announced_solves
         WHERE challenge_id IS NOT NULL
         ORDER BY id",
    )?;
    let records = stmt
        .query_map([], |row| {
            Ok(AnnouncedRecord {
                challenge_id: row.get(0)?,
                solver_id: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_empty_db_has_nothing_announced() {
        let conn = test_db();
        assert!(load_announced(&conn).unwrap().is_empty());
        assert!(list_announced(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_insert_then_load() {
        let conn = test_db();
        let first = insert_announced(
            &conn,
            &AnnouncedRecord {
                challenge_id: 7,
                solver_id: 42,
            },
        )
        .unwrap();
        let second = insert_announced(
            &conn,
            &AnnouncedRecord {
                challenge_id: 8,
                solver_id: 42,
            },
        )
        .unwrap();
        assert!(second > first);

        let ids = load_announced(&conn).unwrap();
        assert_eq!(ids, HashSet::from([7, 8]));

        let records = list_announced(&conn).unwrap();
        assert_eq!(records[0].challenge_id, 7);
        assert_eq!(records[0].solver_id, 42);
    }

    #[test]
    fn test_load_collapses_duplicate_rows() {
        // The table has no uniqueness constraint, so older databases
        // may hold more than one row per challenge.
        let conn = test_db();
        for solver in [1, 2] {
            insert_announced(
                &conn,
                &AnnouncedRecord {
                    challenge_id: 5,
                    solver_id: solver,
                },
            )
            .unwrap();
        }
        assert_eq!(load_announced(&conn).unwrap().len(), 1);
        assert_eq!(list_announced(&conn).unwrap().len(), 2);
    }
}
