// SqliteStore — rusqlite backend implementing AnnouncementStore.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::AnnouncedRecord;
use super::traits::AnnouncementStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl AnnouncementStore for SqliteStore {
    async fn load_announced(&self) -> Result<HashSet<i64>> {
        let conn = self.conn.lock().await;
        Ok(super::queries::load_announced(&conn)?)
    }

    async fn record(&self, record: &AnnouncedRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_announced(&conn, record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use crate::error::StorageError;

    fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[tokio::test]
    async fn test_trait_record_roundtrip() {
        let store = test_store();
        assert!(store.load_announced().await.unwrap().is_empty());

        store
            .record(&AnnouncedRecord {
                challenge_id: 7,
                solver_id: 42,
            })
            .await
            .unwrap();

        assert_eq!(store.load_announced().await.unwrap(), HashSet::from([7]));
        let conn = store.conn.lock().await;
        assert_eq!(
            crate::db::queries::list_announced(&conn).unwrap(),
            vec![AnnouncedRecord {
                challenge_id: 7,
                solver_id: 42
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_table_surfaces_storage_error() {
        let store = SqliteStore::new(Connection::open_in_memory().unwrap());
        let err = store.load_announced().await.unwrap_err();
        assert!(err.downcast_ref::<StorageError>().is_some());
    }
}
