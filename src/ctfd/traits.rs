// Scoreboard trait — the read-only view of the CTF platform.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Challenge, Solve};

/// Read-only access to challenges and their solves.
///
/// Errors carry an `UpstreamError` so callers can tell transient network
/// trouble apart from everything else.
#[async_trait]
pub trait Scoreboard: Send + Sync {
    /// All challenges in platform order, optionally only those with solves.
    async fn list_challenges(&self, solved_only: bool) -> Result<Vec<Challenge>>;

    /// The earliest solve of a challenge, or `None` if the list is empty.
    async fn first_blood(&self, challenge_id: i64) -> Result<Option<Solve>>;
}
