// Polling loop — runs the announcer forever on a fixed interval.
//
// Cycles never overlap: each one runs to completion, then the loop sleeps.
// Timeouts and dropped connections just cost one interval. Anything else
// (a broken database above all) ends the loop with the error.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::announce::Announcer;
use crate::error::UpstreamError;

/// Whether a cycle error should be waited out instead of terminating.
pub fn is_recoverable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<UpstreamError>()
        .is_some_and(UpstreamError::is_transient)
}

/// Turn a signal listener into a shutdown future for `run`.
///
/// If the listener fails to install, this never resolves, so the bot keeps
/// polling until killed instead of stopping after its first cycle.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to install signal handler, running until killed");
        std::future::pending::<()>().await;
    }
}

/// Startup mode selection, done once before the first cycle.
///
/// Unless `existing` is set, every challenge solved before startup is
/// silently marked announced.
pub async fn prepare(announcer: &mut Announcer<'_>, existing: bool) -> Result<()> {
    if existing {
        info!("Announcing existing first bloods...");
        return Ok(());
    }

    info!("Skipping existing first bloods...");
    let seeded = announcer.seed_existing().await?;
    info!(seeded = seeded, "Existing first bloods skipped");
    Ok(())
}

/// Run cycles until `shutdown` resolves.
///
/// `shutdown` is only observed while sleeping between cycles; an
/// in-flight cycle is never cut short.
pub async fn run<F>(announcer: &mut Announcer<'_>, interval: Duration, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    info!("Bot running, waiting for first bloods...");

    loop {
        debug!("Fetching new solves...");
        match announcer.run_cycle().await {
            Ok(report) => {
                if report.announced > 0 || report.failed > 0 {
                    info!(
                        announced = report.announced,
                        failed = report.failed,
                        pending = report.pending,
                        "Cycle complete"
                    );
                } else {
                    debug!(solved = report.solved, pending = report.pending, "Cycle complete");
                }
            }
            Err(e) if is_recoverable(&e) => match e.downcast_ref::<UpstreamError>() {
                Some(UpstreamError::Timeout { .. }) => warn!("Request timed out, retrying..."),
                _ => warn!(error = %e, "Connection failed, retrying..."),
            },
            Err(e) => return Err(e),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use reqwest::StatusCode;

    #[test]
    fn timeout_is_recoverable() {
        let err: anyhow::Error = UpstreamError::Timeout {
            endpoint: "/api/v1/challenges".to_string(),
        }
        .into();
        assert!(is_recoverable(&err));
    }

    #[test]
    fn http_status_is_fatal() {
        let err: anyhow::Error = UpstreamError::HttpStatus {
            endpoint: "/api/v1/challenges".to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
        .into();
        assert!(!is_recoverable(&err));
    }

    #[test]
    fn storage_error_is_fatal_even_with_context() {
        let err = anyhow::Error::from(StorageError::from(rusqlite::Error::QueryReturnedNoRows))
            .context("Failed to record");
        assert!(!is_recoverable(&err));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_signal_handler_never_shuts_down() {
        let shutdown = shutdown_on(async {
            Err::<(), _>(std::io::Error::other("signal handler unavailable"))
        });
        let waited = tokio::time::timeout(Duration::from_secs(3600), shutdown).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn delivered_signal_shuts_down() {
        let shutdown = shutdown_on(async { Ok::<(), std::io::Error>(()) });
        tokio::time::timeout(Duration::from_secs(1), shutdown)
            .await
            .unwrap();
    }

    #[test]
    fn plain_errors_are_fatal() {
        assert!(!is_recoverable(&anyhow::anyhow!("boom")));
    }
}
