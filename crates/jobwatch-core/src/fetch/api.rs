//! The job server as seen by the polling engine.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::error::FetchError;
use super::http::{self, Method, Timeouts};
use crate::job::{Job, JobId, JobStatus};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Requests the engine makes against the job server. No retries happen at
/// this layer; a single failure is returned as-is.
///
/// A trait so tests can drive the engine with scripted snapshots.
pub trait JobApi: Send + Sync {
    /// `GET /jobs/{id}`: the current snapshot.
    fn fetch_job<'a>(&'a self, id: &'a JobId) -> BoxFuture<'a, Result<Job, FetchError>>;

    /// `POST /jobs/{id}/cancel`: ask the server to abort the job.
    fn cancel_job<'a>(&'a self, id: &'a JobId) -> BoxFuture<'a, Result<(), FetchError>>;

    /// POST a JSON body to an operation endpoint and return the JSON reply.
    fn post_json<'a>(
        &'a self,
        path: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, FetchError>>;
}

/// Wire shape of `GET /jobs/{id}`.
#[derive(Debug, Deserialize)]
struct JobSnapshot {
    status: JobStatus,
    #[serde(default)]
    progress: f64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// `JobApi` over HTTP using libcurl. Stateless apart from its base URL, so
/// one instance can be shared by any number of sessions behind an `Arc`.
#[derive(Debug, Clone)]
pub struct HttpJobApi {
    base: Url,
    timeouts: Timeouts,
}

impl HttpJobApi {
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, FetchError> {
        let mut base =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!("{base_url}: not a base URL")));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, timeouts })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL extended by `segments`; each segment is percent-encoded.
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, FetchError> {
        let timeouts = self.timeouts;
        tracing::debug!(%url, ?method, "job server request");
        tokio::task::spawn_blocking(move || http::perform(method, url.as_str(), body.as_deref(), timeouts))
            .await
            .map_err(FetchError::Join)?
    }
}

impl JobApi for HttpJobApi {
    fn fetch_job<'a>(&'a self, id: &'a JobId) -> BoxFuture<'a, Result<Job, FetchError>> {
        Box::pin(async move {
            let id_text = id.to_string();
            let url = self.endpoint(["jobs", id_text.as_str()])?;
            let bytes = self.request(Method::Get, url, None).await?;
            let snap: JobSnapshot = serde_json::from_slice(&bytes)?;
            Ok(Job {
                id: id.clone(),
                status: snap.status,
                progress: snap.progress,
                message: snap.message,
                result: snap.result,
                error: snap.error,
            })
        })
    }

    fn cancel_job<'a>(&'a self, id: &'a JobId) -> BoxFuture<'a, Result<(), FetchError>> {
        Box::pin(async move {
            let id_text = id.to_string();
            let url = self.endpoint(["jobs", id_text.as_str(), "cancel"])?;
            self.request(Method::Post, url, Some(Vec::new())).await?;
            Ok(())
        })
    }

    fn post_json<'a>(
        &'a self,
        path: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, FetchError>> {
        Box::pin(async move {
            let url = self.endpoint(path.split('/').filter(|s| !s.is_empty()))?;
            let payload = serde_json::to_vec(body)?;
            let bytes = self.request(Method::Post, url, Some(payload)).await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Object(Default::default()));
            }
            Ok(serde_json::from_slice(&bytes)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = HttpJobApi::new("http://localhost:8000/api", Timeouts::default()).unwrap();
        assert_eq!(api.base_url().as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn endpoints_extend_base_path() {
        let api = HttpJobApi::new("http://localhost:8000/api/", Timeouts::default()).unwrap();
        let url = api.endpoint(["jobs", "42", "cancel"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/jobs/42/cancel");
    }

    #[test]
    fn text_ids_are_percent_encoded() {
        let api = HttpJobApi::new("http://localhost:8000/", Timeouts::default()).unwrap();
        let url = api.endpoint(["jobs", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/jobs/a%20b%2Fc");
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            HttpJobApi::new("mailto:someone@example.com", Timeouts::default()),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(HttpJobApi::new("not a url", Timeouts::default()).is_err());
    }
}
