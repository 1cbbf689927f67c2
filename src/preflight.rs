// Startup reachability checks.
//
// A typo in the webhook or CTFd URL should fail loudly at launch rather
// than show up as an endless stream of retries in the polling loop.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::config::Config;
use crate::ctfd::client::{REQUEST_TIMEOUT, USER_AGENT};
use crate::ctfd::CtfdClient;

/// GET `url` and require a 200.
async fn expect_ok(client: &Client, url: &str, what: &str) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Invalid {what}: request failed"))?;

    if response.status() != StatusCode::OK {
        anyhow::bail!("Invalid {what}: got HTTP {}", response.status());
    }
    Ok(())
}

/// A Discord webhook answers GET with its own metadata when it exists.
pub async fn check_webhook(client: &Client, url: &str) -> Result<()> {
    expect_ok(client, url, "webhook URL").await
}

pub async fn check_platform(client: &Client, url: &str) -> Result<()> {
    expect_ok(client, url, "CTFd URL").await
}

/// Check that every configured endpoint answers before the bot starts
/// polling. Expects a config that already passed `Config::validate`.
pub async fn run(config: &Config, ctfd: &CtfdClient) -> Result<()> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    check_webhook(&client, &config.webhook_url).await?;
    check_platform(&client, &config.ctfd_url).await?;
    ctfd.check_access().await?;

    info!(ctfd = config.ctfd_url, "Configuration validated");
    Ok(())
}
