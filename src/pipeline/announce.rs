// Announcement engine: solved challenges -> first blood -> webhook -> store.
//
// One cycle:
// 1. Fetch the solved challenges from CTFd
// 2. Skip every challenge already in the announced set
// 3. Look up the first blood for the rest, one at a time
// 4. Post the announcement
// 5. On delivery, record it in the database and the announced set
//
// A failure on one challenge never stops the others. Only a failed
// challenge list aborts the cycle, and only a storage failure is fatal.

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::ctfd::{Challenge, Scoreboard};
use crate::db::models::AnnouncedRecord;
use crate::db::AnnouncementStore;
use crate::notify::{Delivery, Notifier};

/// Build the Discord message for a first blood.
pub fn format_announcement(challenge: &str, user: &str) -> String {
    format!(":drop_of_blood: First blood for **{challenge}** goes to **{user}**! :drop_of_blood:")
}

/// Tally of one poll cycle, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Challenges with at least one solve.
    pub solved: usize,
    /// First bloods delivered and recorded this cycle.
    pub announced: usize,
    /// Solved challenges whose solve list came back empty.
    pub pending: usize,
    /// Challenges skipped because a request failed or the webhook refused.
    pub failed: usize,
}

/// What happened to a single candidate challenge.
enum Outcome {
    Announced,
    Pending,
    Failed,
}

/// Owns the in-memory announced set and drives one cycle at a time.
///
/// The set is loaded from the store once, then only grows through
/// successful announcements or startup seeding.
pub struct Announcer<'a> {
    scoreboard: &'a dyn Scoreboard,
    notifier: &'a dyn Notifier,
    store: &'a dyn AnnouncementStore,
    announced: HashSet<i64>,
}

impl<'a> Announcer<'a> {
    /// Load previously announced challenges from the store.
    pub async fn new(
        scoreboard: &'a dyn Scoreboard,
        notifier: &'a dyn Notifier,
        store: &'a dyn AnnouncementStore,
    ) -> Result<Announcer<'a>> {
        let announced = store
            .load_announced()
            .await
            .context("Failed to load announced solves")?;

        info!(count = announced.len(), "Loaded announced first bloods");

        Ok(Self {
            scoreboard,
            notifier,
            store,
            announced,
        })
    }

    pub fn announced(&self) -> &HashSet<i64> {
        &self.announced
    }

    /// Mark every currently-solved challenge as announced without posting.
    ///
    /// Nothing is written to the store: seeded ids only suppress the
    /// announcements for this process. Returns how many ids were added.
    pub async fn seed_existing(&mut self) -> Result<usize> {
        let solved = self.scoreboard.list_challenges(true).await?;
        let before = self.announced.len();
        self.announced.extend(solved.iter().map(|c| c.id));
        Ok(self.announced.len() - before)
    }

    /// Run one poll cycle.
    ///
    /// Errors from listing challenges abort the cycle untouched. Errors
    /// from the store are returned as-is and must be treated as fatal.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let solved = self.scoreboard.list_challenges(true).await?;

        let mut report = CycleReport {
            solved: solved.len(),
            ..CycleReport::default()
        };

        for challenge in &solved {
            if self.announced.contains(&challenge.id) {
                continue;
            }

            match self.try_announce(challenge).await? {
                Outcome::Announced => report.announced += 1,
                Outcome::Pending => report.pending += 1,
                Outcome::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    async fn try_announce(&mut self, challenge: &Challenge) -> Result<Outcome> {
        let first_blood = match self.scoreboard.first_blood(challenge.id).await {
            Ok(Some(solve)) => solve,
            Ok(None) => {
                debug!(
                    challenge = challenge.name,
                    solves = challenge.solve_count,
                    "Challenge reports solves but no solver yet, will retry"
                );
                return Ok(Outcome::Pending);
            }
            Err(e) => {
                warn!(challenge = challenge.name, error = %e, "Failed to fetch first blood");
                return Ok(Outcome::Failed);
            }
        };

        info!(
            challenge = challenge.name,
            solver = first_blood.solver_name,
            solved_at = ?first_blood.date,
            "Announcing first blood"
        );

        let content = format_announcement(&challenge.name, &first_blood.solver_name);
        match self.notifier.send(&content).await {
            Ok(Delivery::Delivered) => {}
            Ok(Delivery::Rejected(status)) => {
                warn!(challenge = challenge.name, status = %status, "Webhook rejected announcement");
                return Ok(Outcome::Failed);
            }
            Err(e) => {
                warn!(challenge = challenge.name, error = %e, "Failed to send announcement");
                return Ok(Outcome::Failed);
            }
        }

        let recorded = self
            .store
            .record(&AnnouncedRecord {
                challenge_id: challenge.id,
                solver_id: first_blood.solver_id,
            })
            .await;

        // The message is out either way; never post it twice from this process.
        self.announced.insert(challenge.id);

        recorded.with_context(|| {
            format!(
                "Announced first blood for {} but failed to record it",
                challenge.name
            )
        })?;

        Ok(Outcome::Announced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_matches_discord_template() {
        assert_eq!(
            format_announcement("pwn101", "alice"),
            ":drop_of_blood: First blood for **pwn101** goes to **alice**! :drop_of_blood:"
        );
    }

    #[test]
    fn announcement_keeps_names_verbatim() {
        let msg = format_announcement("web/xss {2}", "team *stars*");
        assert!(msg.contains("**web/xss {2}**"));
        assert!(msg.contains("**team *stars***"));
    }
}
