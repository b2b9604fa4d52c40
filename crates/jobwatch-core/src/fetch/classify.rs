//! Failure kinds for job server requests, used in retry logs and in
//! `PollError::RetriesExhausted`.

use super::error::FetchError;
use std::fmt;

/// High-level classification of a transport failure.
///
/// Every kind counts against the same consecutive-failure budget while
/// polling; the kind is carried for logs and for the final error so callers
/// can tell an unreachable server from a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Server error that is not throttling (5xx).
    Http5xx(u16),
    /// Anything else: 4xx, malformed body, bad URL.
    Other,
}

impl ErrorKind {
    /// True when another fetch could succeed without any change on our side.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => f.write_str("timeout"),
            ErrorKind::Throttled => f.write_str("throttled"),
            ErrorKind::Connection => f.write_str("connection"),
            ErrorKind::Http5xx(code) => write!(f, "http {}", code),
            ErrorKind::Other => f.write_str("other"),
        }
    }
}

/// Kind of a non-2xx reply from the job server. 429 and 503 mean the
/// server is shedding load; other 5xx are server faults; 4xx are ours.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Kind of a libcurl failure: timeouts apart from unreachable or dropped
/// connections, everything else `Other`.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Kind of a failed status fetch, cancel or submission. A failed blocking
/// task counts as a connection problem; undecodable replies are `Other`.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::Join(_) => ErrorKind::Connection,
        FetchError::Decode(_) | FetchError::InvalidUrl(_) => ErrorKind::Other,
    }
}
