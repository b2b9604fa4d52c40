use std::time::Duration;

use thiserror::Error;

use crate::fetch::{ErrorKind, FetchError};
use crate::job::{Job, JobId};

/// Message used when a failed job carries no error text.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Job failed";

/// Why tracking a job ended without a completed result.
#[derive(Debug, Error)]
pub enum PollError {
    /// Server reported `failed`. Not retried.
    #[error("{message}")]
    Failed { job_id: JobId, message: String },

    /// Server reported `cancelled`. Not retried.
    #[error("job was cancelled")]
    Cancelled { job_id: JobId },

    /// Local interval budget ran out while the job was still running.
    #[error("job {job_id} still running after {elapsed:?} of polling")]
    Timeout { job_id: JobId, elapsed: Duration },

    /// Too many consecutive status fetches failed; wraps the last one.
    #[error("status fetch for job {job_id} failed after {attempts} attempts ({kind}): {source}")]
    RetriesExhausted {
        job_id: JobId,
        attempts: u32,
        kind: ErrorKind,
        #[source]
        source: FetchError,
    },
}

impl PollError {
    /// Error for a snapshot whose status is `failed`.
    pub fn failed(job: &Job) -> Self {
        PollError::Failed {
            job_id: job.id.clone(),
            message: job
                .error
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        }
    }

    pub fn job_id(&self) -> &JobId {
        match self {
            PollError::Failed { job_id, .. }
            | PollError::Cancelled { job_id }
            | PollError::Timeout { job_id, .. }
            | PollError::RetriesExhausted { job_id, .. } => job_id,
        }
    }
}

/// A caller-supplied hook returned an error or panicked. Logged by the
/// engine and never propagated; the session carries on.
#[derive(Debug, Error)]
#[error("{hook} hook for job {job_id} failed: {message}")]
pub struct CallbackError {
    pub job_id: JobId,
    pub hook: &'static str,
    pub message: String,
}
