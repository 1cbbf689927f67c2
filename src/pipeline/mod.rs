// Announcement pipeline: the per-cycle engine and the loop that drives it.

pub mod announce;
pub mod poll;
