//! Server-tracked job snapshots.
//!
//! A job is created by the server when an operation is submitted and is
//! read-only from the client's side: we only ever observe snapshots of it.

mod id;
mod status;

pub use id::JobId;
pub use status::JobStatus;

use serde::{Deserialize, Serialize};

/// One observed snapshot of a server-side job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Advisory completion percentage (0–100).
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Success payload; only meaningful once `status` is `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure text; only meaningful once `status` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Snapshot with the given status and progress and no payload.
    pub fn new(id: impl Into<JobId>, status: JobStatus, progress: f64) -> Self {
        Self {
            id: id.into(),
            status,
            progress,
            message: None,
            result: None,
            error: None,
        }
    }

    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
