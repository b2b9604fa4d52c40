//! Post an operation and normalize its sync or job-based reply.

use std::sync::{Arc, Mutex};

use anyhow::Result as HookResult;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

use super::error::SubmitError;
use super::operation::{
    DetectRecurringRequest, DetectTransfersRequest, ImportCsvRequest, Operation,
    RecategorizeRequest,
};
use super::outcome::Submission;
use crate::fetch::JobApi;
use crate::job::{Job, JobId};
use crate::poll::{self, PollConfig, PollError, PollHandle, PollObserver};

/// Progress callback for observed submissions.
pub type ProgressFn = Arc<dyn Fn(&Job) + Send + Sync>;

/// What to do when the server answers with a job instead of a result.
#[derive(Clone)]
pub enum SubmitMode {
    /// Return `{ job_id, async: true, status: "pending" }` immediately.
    FireAndForget,
    /// Wait for the job with the blocking waiter.
    Blocking(PollConfig),
    /// Track the job live, passing every snapshot to `progress`.
    Observed {
        config: PollConfig,
        progress: ProgressFn,
    },
}

impl SubmitMode {
    pub fn observed(config: PollConfig, progress: impl Fn(&Job) + Send + Sync + 'static) -> Self {
        SubmitMode::Observed {
            config,
            progress: Arc::new(progress),
        }
    }
}

impl std::fmt::Debug for SubmitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitMode::FireAndForget => f.write_str("FireAndForget"),
            SubmitMode::Blocking(cfg) => f.debug_tuple("Blocking").field(cfg).finish(),
            SubmitMode::Observed { config, .. } => {
                f.debug_struct("Observed").field("config", config).finish_non_exhaustive()
            }
        }
    }
}

/// Posts `body` to the operation's endpoint and normalizes the reply.
///
/// A reply without `job_id` is the final result. Otherwise `mode` decides
/// whether to return at once, wait, or observe the job.
pub async fn submit<A, B>(
    api: &Arc<A>,
    operation: Operation,
    body: &B,
    mode: SubmitMode,
) -> Result<Submission, SubmitError>
where
    A: JobApi + ?Sized + 'static,
    B: Serialize + ?Sized,
{
    let payload =
        serde_json::to_value(body).map_err(|source| SubmitError::Encode { operation, source })?;
    let reply = api
        .post_json(operation.path(), &payload)
        .await
        .map_err(|source| SubmitError::Request { operation, source })?;

    let job_id = match job_id_of(&reply) {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::info!(%operation, "completed synchronously");
            return Ok(Submission::synchronous(reply));
        }
        Err(value) => return Err(SubmitError::BadJobId { operation, value }),
    };
    tracing::info!(%operation, job_id = %job_id, ?mode, "server started job");

    match mode {
        SubmitMode::FireAndForget => Ok(Submission::accepted(job_id)),
        SubmitMode::Blocking(config) => {
            let job = poll::wait_for_job(api.as_ref(), &job_id, &config).await?;
            Ok(Submission::finished(job_id, job.result))
        }
        SubmitMode::Observed { config, progress } => {
            let (tx, rx) = oneshot::channel();
            let relay = Relay {
                progress,
                outcome: Mutex::new(Some(tx)),
            };
            let handle = poll::watch(Arc::clone(api), job_id.clone(), relay, config);
            let _guard = StopOnDrop(handle);
            match rx.await {
                Ok(Ok(job)) => Ok(Submission::finished(job_id, job.result)),
                Ok(Err(err)) => Err(SubmitError::Job(err)),
                Err(_) => Err(SubmitError::Interrupted(job_id)),
            }
        }
    }
}

/// `job_id` field of a reply: absent or null means a synchronous result.
fn job_id_of(reply: &Value) -> Result<Option<JobId>, Value> {
    match reply.get("job_id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(JobId::Text(s.clone()))),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|id| Some(JobId::Int(id)))
            .ok_or_else(|| Value::Number(n.clone())),
        Some(other) => Err(other.clone()),
    }
}

/// Forwards snapshots to the caller's progress callback and resolves the
/// waiting submission from the terminal hook.
struct Relay {
    progress: ProgressFn,
    outcome: Mutex<Option<oneshot::Sender<Result<Job, PollError>>>>,
}

impl Relay {
    fn resolve(&self, outcome: Result<Job, PollError>) {
        let tx = self.outcome.lock().ok().and_then(|mut slot| slot.take());
        if let Some(tx) = tx {
            let _ = tx.send(outcome);
        }
    }
}

impl PollObserver for Relay {
    fn on_update(&self, job: &Job) -> HookResult<()> {
        (self.progress)(job);
        Ok(())
    }

    fn on_complete(&self, job: &Job) -> HookResult<()> {
        self.resolve(Ok(job.clone()));
        Ok(())
    }

    fn on_error(&self, error: PollError, _job: Option<&Job>) -> HookResult<()> {
        self.resolve(Err(error));
        Ok(())
    }
}

/// Stops the observed session if the submission future is dropped early.
struct StopOnDrop(PollHandle);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.stop();
    }
}

pub async fn import_csv<A>(
    api: &Arc<A>,
    request: &ImportCsvRequest,
    mode: SubmitMode,
) -> Result<Submission, SubmitError>
where
    A: JobApi + ?Sized + 'static,
{
    submit(api, Operation::ImportCsv, request, mode).await
}

pub async fn detect_transfers<A>(
    api: &Arc<A>,
    request: &DetectTransfersRequest,
    mode: SubmitMode,
) -> Result<Submission, SubmitError>
where
    A: JobApi + ?Sized + 'static,
{
    submit(api, Operation::DetectTransfers, request, mode).await
}

pub async fn detect_recurring<A>(
    api: &Arc<A>,
    request: &DetectRecurringRequest,
    mode: SubmitMode,
) -> Result<Submission, SubmitError>
where
    A: JobApi + ?Sized + 'static,
{
    submit(api, Operation::DetectRecurring, request, mode).await
}

pub async fn recategorize<A>(
    api: &Arc<A>,
    request: &RecategorizeRequest,
    mode: SubmitMode,
) -> Result<Submission, SubmitError>
where
    A: JobApi + ?Sized + 'static,
{
    submit(api, Operation::Recategorize, request, mode).await
}
