use serde::Serialize;
use serde_json::{Map, Value};

use crate::job::{JobId, JobStatus};

/// Uniform result of submitting an operation, whether the server answered
/// directly or handed back a job.
///
/// Serializes to the flattened shape callers expect: the payload's own
/// fields plus `async`, and `job_id`/`status` when a job was involved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl Submission {
    /// The server answered with the final result.
    pub fn synchronous(reply: Value) -> Self {
        let mut payload = into_object(reply);
        payload.remove("async");
        Self {
            payload,
            job_id: None,
            is_async: false,
            status: None,
        }
    }

    /// A job was started and nobody is waiting for it.
    pub fn accepted(job_id: JobId) -> Self {
        Self {
            payload: Map::new(),
            job_id: Some(job_id),
            is_async: true,
            status: Some(JobStatus::Pending),
        }
    }

    /// A job ran to completion; its result becomes the payload.
    pub fn finished(job_id: JobId, result: Option<Value>) -> Self {
        let mut payload = result.map(into_object).unwrap_or_default();
        payload.remove("job_id");
        payload.remove("async");
        Self {
            payload,
            job_id: Some(job_id),
            is_async: true,
            status: None,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Objects pass through, null is empty, anything else lands under `result`.
fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}
