//! Status fetcher: single requests to the job server.
//!
//! This layer performs exactly one request per call and never retries;
//! retry budgets and backoff live in `poll`. Transport failures are
//! classified here so every layer above shares the same vocabulary.

mod api;
mod classify;
mod error;
mod http;

pub use api::{BoxFuture, HttpJobApi, JobApi};
pub use classify::{classify, classify_curl_error, classify_http_status, ErrorKind};
pub use error::FetchError;
pub use http::Timeouts;
