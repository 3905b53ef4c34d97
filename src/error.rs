//! Error taxonomy for place discovery

use thiserror::Error;

/// Errors surfaced by a search, unmodified, to the caller
#[derive(Debug, Error)]
pub enum SearchError {
    /// The upstream capability was unreachable or timed out
    #[error("provider transport error: {message}")]
    ProviderTransport { message: String, timed_out: bool },

    /// The upstream responded with a non-success, non-zero-results status
    #[error("provider returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    ProviderStatus {
        status: String,
        message: Option<String>,
    },

    /// The upstream body did not have the expected shape
    #[error("malformed provider response for {context}: {source}")]
    MalformedResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request was rejected before any network call
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn status(status: impl Into<String>, message: Option<String>) -> Self {
        Self::ProviderStatus {
            status: status.into(),
            message,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::ProviderTransport {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::ProviderTransport {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ProviderTransport { timed_out: true, .. })
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}
