use thiserror::Error;

use super::operation::Operation;
use crate::fetch::FetchError;
use crate::job::JobId;
use crate::poll::PollError;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("could not encode {operation} request: {source}")]
    Encode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The triggering POST itself failed. Never retried; resubmit instead.
    #[error("{operation} request failed: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: FetchError,
    },

    #[error("{operation} reply has an unusable job_id: {value}")]
    BadJobId {
        operation: Operation,
        value: serde_json::Value,
    },

    /// The job was tracked but did not complete.
    #[error(transparent)]
    Job(#[from] PollError),

    /// The poll session ended without reporting an outcome.
    #[error("tracking of job {0} ended without an outcome")]
    Interrupted(JobId),
}
