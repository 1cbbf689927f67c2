// Discord webhook notifier.
//
// Executes a webhook with a plain `content` message. The webhook URL is
// a bearer secret in itself, so it is never logged.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::traits::{Delivery, Notifier};
use crate::ctfd::client::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::UpstreamError;

/// Body of a webhook execution.
#[derive(Debug, Serialize)]
pub struct WebhookMessage<'a> {
    pub content: &'a str,
}

pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn send(&self, content: &str) -> Result<Delivery> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { content })
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest("Discord webhook", e))?;

        let delivery = Delivery::from_status(response.status());
        if let Delivery::Rejected(status) = delivery {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, body = %body, "Webhook rejected message");
        }

        Ok(delivery)
    }
}
