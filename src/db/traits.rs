// Announcement store trait — the durable half of the dedup state.
//
// The announcer only ever needs two things from storage: the set of
// challenges announced so far, and a way to append one more. Keeping it
// behind a trait lets the engine tests run against an in-memory fake.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use super::models::AnnouncedRecord;

#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// All distinct challenge ids ever recorded. Called once at startup.
    async fn load_announced(&self) -> Result<HashSet<i64>>;

    /// Persist one announced first blood.
    ///
    /// Only call this after the webhook confirmed delivery. Errors carry a
    /// `StorageError` and are fatal to the caller.
    async fn record(&self, record: &AnnouncedRecord) -> Result<()>;
}
