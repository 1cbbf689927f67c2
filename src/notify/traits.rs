// Notifier trait — one-shot delivery of a formatted announcement.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;

/// What the webhook made of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint accepted the message (200 or 204).
    Delivered,
    /// The endpoint answered, but with some other status.
    Rejected(StatusCode),
}

impl Delivery {
    /// Map a webhook response status onto a delivery outcome.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::OK | StatusCode::NO_CONTENT => Delivery::Delivered,
            other => Delivery::Rejected(other),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post `content` once. Transport failures come back as an
    /// `UpstreamError` inside the `Err`; both that and `Rejected` mean
    /// "not delivered, try again next poll".
    async fn send(&self, content: &str) -> Result<Delivery>;
}
