// Error taxonomy for the announcer.
//
// Most of the app propagates `anyhow::Error`, but the polling loop has to
// tell a dropped connection apart from a corrupt database. These typed
// errors ride inside `anyhow` and are recovered with `downcast_ref`.

use reqwest::StatusCode;
use thiserror::Error;

/// A failure talking to CTFd or the Discord webhook.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("connection to {endpoint} failed: {source}")]
    ConnectionFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: StatusCode },

    #[error("unexpected response from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    /// Classify a reqwest transport error for the given endpoint.
    pub fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        let endpoint = endpoint.to_string();
        if err.is_timeout() {
            UpstreamError::Timeout { endpoint }
        } else if err.is_decode() {
            UpstreamError::Malformed {
                endpoint,
                source: err,
            }
        } else {
            UpstreamError::ConnectionFailed {
                endpoint,
                source: Box::new(err),
            }
        }
    }

    /// Timeouts and dropped connections are worth waiting out; everything
    /// else points at a misconfiguration or a broken upstream.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UpstreamError::Timeout { .. } | UpstreamError::ConnectionFailed { .. }
        )
    }
}

/// The announcement database could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_not_transient() {
        let err = UpstreamError::HttpStatus {
            endpoint: "/api/v1/challenges".to_string(),
            status: StatusCode::BAD_GATEWAY,
        };
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "/api/v1/challenges returned HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn timeout_is_transient() {
        let err = UpstreamError::Timeout {
            endpoint: "/api/v1/challenges".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn connection_refused_is_transient() {
        let err = UpstreamError::ConnectionFailed {
            endpoint: "/api/v1/challenges".to_string(),
            source: Box::new(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)),
        };
        assert!(err.is_transient());
        assert!(err.to_string().starts_with("connection to /api/v1/challenges failed"));
    }

    #[test]
    fn storage_error_wraps_rusqlite() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(err.to_string().starts_with("database error"));
    }
}
