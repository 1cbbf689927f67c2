// Data models — Rust structs that map to database rows.

/// One announced first blood, as stored in `announced_solves`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncedRecord {
    pub challenge_id: i64,
    pub solver_id: i64,
}
