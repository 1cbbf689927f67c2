// HTTP client for the CTFd REST API.
//
// Built once at startup: the base URL, the token header and the timeout
// live on the struct, and the underlying reqwest::Client (and its
// connection pool) is reused for every poll.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{self, Challenge, Envelope, Solve};
use super::traits::Scoreboard;
use crate::error::UpstreamError;

/// Per-request timeout for every CTFd call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) const USER_AGENT: &str = "firstblood/0.1 (ctfd-first-blood-announcer)";

/// Authenticated client for a single CTFd instance.
pub struct CtfdClient {
    client: reqwest::Client,
    base_url: String,
}

impl CtfdClient {
    /// Create a client for `base_url` authenticating with an access token.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Token {token}"))
            .context("CTFd access token contains invalid header characters")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET an API path and unwrap the `data` array from the envelope.
    ///
    /// `path` is relative to the base URL, e.g. `/api/v1/challenges`.
    pub async fn api_get<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);

        debug!(path = path, "CTFd GET request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus {
                endpoint: path.to_string(),
                status,
            }
            .into());
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(path, e))?;

        if envelope.success == Some(false) {
            debug!(path = path, "CTFd reported success=false");
        }

        Ok(envelope.data)
    }

    /// Authenticated probe of the challenge list, used to validate the token.
    pub async fn check_access(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/v1/challenges", self.base_url))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest("/api/v1/challenges", e))?;

        if response.status() != reqwest::StatusCode::OK {
            anyhow::bail!("Unauthorized - invalid CTFd URL or access token");
        }
        Ok(())
    }
}

#[async_trait]
impl Scoreboard for CtfdClient {
    async fn list_challenges(&self, solved_only: bool) -> Result<Vec<Challenge>> {
        let challenges: Vec<Challenge> = self.api_get("/api/v1/challenges").await?;

        debug!(count = challenges.len(), "Fetched challenges");

        if solved_only {
            Ok(models::solved(challenges))
        } else {
            Ok(challenges)
        }
    }

    async fn first_blood(&self, challenge_id: i64) -> Result<Option<Solve>> {
        let solves: Vec<Solve> = self
            .api_get(&format!("/api/v1/challenges/{challenge_id}/solves"))
            .await?;

        // CTFd lists solves earliest first; its ordering is authoritative.
        Ok(solves.into_iter().next())
    }
}
