//! Blocking waiter: poll until the job reaches a terminal status.

use super::error::PollError;
use super::policy::{PollConfig, PollSession, RetryDecision};
use crate::fetch::{classify, JobApi};
use crate::job::{Job, JobId, JobStatus};

/// Polls `job_id` until it completes, returning the completed snapshot.
///
/// Exactly one outcome is produced: the completed job, or an error for a
/// failed/cancelled job, an exhausted interval budget, or `max_retries`
/// consecutive fetch failures.
pub async fn wait_for_job<A>(api: &A, job_id: &JobId, config: &PollConfig) -> Result<Job, PollError>
where
    A: JobApi + ?Sized,
{
    let mut session = PollSession::new(*config);
    loop {
        if session.timed_out() {
            let err = PollError::Timeout {
                job_id: job_id.clone(),
                elapsed: session.elapsed(),
            };
            tracing::warn!(job_id = %job_id, "{}", err);
            return Err(err);
        }

        let delay = match api.fetch_job(job_id).await {
            Ok(job) => {
                session.record_success();
                tracing::debug!(
                    job_id = %job_id,
                    status = %job.status,
                    progress = job.progress,
                    "job snapshot"
                );
                match job.status {
                    JobStatus::Completed => {
                        tracing::info!(job_id = %job_id, "job completed");
                        return Ok(job);
                    }
                    JobStatus::Failed => return Err(PollError::failed(&job)),
                    JobStatus::Cancelled => {
                        return Err(PollError::Cancelled {
                            job_id: job_id.clone(),
                        })
                    }
                    JobStatus::Pending | JobStatus::Running => session.advance(),
                }
            }
            Err(e) => {
                let kind = classify(&e);
                match session.record_failure() {
                    RetryDecision::GiveUp(attempts) => {
                        let err = PollError::RetriesExhausted {
                            job_id: job_id.clone(),
                            attempts,
                            kind,
                            source: e,
                        };
                        tracing::warn!(job_id = %job_id, "{}", err);
                        return Err(err);
                    }
                    RetryDecision::RetryAfter(delay) => {
                        tracing::warn!(
                            job_id = %job_id,
                            %kind,
                            transient = kind.is_transient(),
                            failures = session.consecutive_failures(),
                            "status fetch failed, retrying in {:?}: {}",
                            delay,
                            e
                        );
                        delay
                    }
                }
            }
        };
        tokio::time::sleep(delay).await;
    }
}
