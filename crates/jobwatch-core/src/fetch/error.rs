//! Transport error for a single request to the job server.

use std::fmt;

/// Error returned by one status fetch, cancel, or submission request.
/// Kept separate from `anyhow` so the poll loop can classify it and count
/// it against the retry budget.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Body was not the JSON shape we expected.
    Decode(serde_json::Error),
    /// Endpoint URL could not be built from the base URL.
    InvalidUrl(String),
    /// The blocking request task panicked or was cancelled.
    Join(tokio::task::JoinError),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Decode(e) => write!(f, "invalid response body: {}", e),
            FetchError::InvalidUrl(msg) => write!(f, "invalid URL: {}", msg),
            FetchError::Join(e) => write!(f, "request task failed: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Decode(e) => Some(e),
            FetchError::Join(e) => Some(e),
            FetchError::Http(_) | FetchError::InvalidUrl(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}
