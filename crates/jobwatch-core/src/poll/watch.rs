//! Live polling controller: track a job in the background and report every
//! snapshot through a `PollObserver`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::PollError;
use super::observer::{contain, ChannelObserver, PollEvent, PollObserver};
use super::policy::{PollConfig, PollSession, RetryDecision};
use super::stop::{StopSignal, Stopper};
use crate::fetch::{classify, JobApi};
use crate::job::{JobId, JobStatus};

/// Handle to a running poll session.
///
/// Dropping the handle detaches the session; it keeps polling until a
/// terminal outcome. Call `stop()` to end it early.
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    signal: Arc<StopSignal>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Halt local polling: cancels the pending wait and suppresses dispatch
    /// for a fetch already in flight. Idempotent. The server-side job is not
    /// touched; use `JobApi::cancel_job` for that.
    pub fn stop(&self) {
        if self.signal.stop() {
            tracing::debug!(job_id = %self.job_id, "poll session stopped by caller");
        }
    }

    /// False once stopped or once a terminal hook has been reached.
    pub fn is_active(&self) -> bool {
        !self.signal.is_stopped()
    }

    pub fn stopper(&self) -> Stopper {
        Stopper {
            signal: Arc::clone(&self.signal),
        }
    }

    /// Wait for the session task to exit (terminal outcome or stop).
    /// Cancel-safe: if the wait is dropped it can be resumed later.
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                tracing::error!(job_id = %self.job_id, "poll session task failed: {}", e);
            }
            self.task = None;
        }
    }
}

/// Starts polling `job_id` immediately on the current Tokio runtime.
///
/// Never fails synchronously: every failure mode is delivered to
/// `observer.on_error`. Must be called from within a Tokio runtime.
pub fn watch<A, O>(api: Arc<A>, job_id: JobId, observer: O, config: PollConfig) -> PollHandle
where
    A: JobApi + ?Sized + 'static,
    O: PollObserver + 'static,
{
    let signal = Arc::new(StopSignal::default());
    let task = tokio::spawn(run_session(
        api,
        job_id.clone(),
        observer,
        config,
        Arc::clone(&signal),
    ));
    PollHandle {
        job_id,
        signal,
        task: Some(task),
    }
}

/// Channel form of `watch`: events arrive in order on the receiver, which
/// yields `None` once the session has ended.
pub fn watch_channel<A>(
    api: Arc<A>,
    job_id: JobId,
    config: PollConfig,
) -> (PollHandle, mpsc::UnboundedReceiver<PollEvent>)
where
    A: JobApi + ?Sized + 'static,
{
    let (observer, rx) = ChannelObserver::new();
    (watch(api, job_id, observer, config), rx)
}

async fn run_session<A, O>(
    api: Arc<A>,
    job_id: JobId,
    observer: O,
    config: PollConfig,
    signal: Arc<StopSignal>,
) where
    A: JobApi + ?Sized,
    O: PollObserver,
{
    let mut session = PollSession::new(config);
    loop {
        if signal.is_stopped() {
            return;
        }
        if observer.is_closed() {
            signal.stop();
            tracing::debug!(job_id = %job_id, "observer closed, ending poll session");
            return;
        }
        let fetched = api.fetch_job(&job_id).await;
        if signal.is_stopped() {
            tracing::debug!(job_id = %job_id, "discarding fetch result after stop");
            return;
        }

        let wait = match fetched {
            Ok(job) => {
                session.record_success();
                tracing::debug!(
                    job_id = %job_id,
                    status = %job.status,
                    progress = job.progress,
                    "job snapshot"
                );
                contain(&job_id, "on_update", || observer.on_update(&job));

                match job.status {
                    JobStatus::Completed => {
                        // A stop from inside on_update wins over the terminal hook.
                        if !signal.stop() {
                            return;
                        }
                        tracing::info!(job_id = %job_id, "job completed");
                        contain(&job_id, "on_complete", || observer.on_complete(&job));
                        return;
                    }
                    JobStatus::Failed | JobStatus::Cancelled => {
                        if !signal.stop() {
                            return;
                        }
                        let err = if job.status == JobStatus::Failed {
                            PollError::failed(&job)
                        } else {
                            PollError::Cancelled {
                                job_id: job_id.clone(),
                            }
                        };
                        tracing::info!(job_id = %job_id, "job ended: {}", err);
                        contain(&job_id, "on_error", || observer.on_error(err, Some(&job)));
                        return;
                    }
                    JobStatus::Pending | JobStatus::Running => {
                        let wait = session.advance();
                        if session.timed_out() {
                            if !signal.stop() {
                                return;
                            }
                            let err = PollError::Timeout {
                                job_id: job_id.clone(),
                                elapsed: session.elapsed(),
                            };
                            tracing::warn!(job_id = %job_id, "{}", err);
                            contain(&job_id, "on_error", || observer.on_error(err, Some(&job)));
                            return;
                        }
                        wait
                    }
                }
            }
            Err(e) => {
                let kind = classify(&e);
                match session.record_failure() {
                    RetryDecision::GiveUp(attempts) => {
                        if !signal.stop() {
                            return;
                        }
                        let err = PollError::RetriesExhausted {
                            job_id: job_id.clone(),
                            attempts,
                            kind,
                            source: e,
                        };
                        tracing::warn!(job_id = %job_id, "{}", err);
                        contain(&job_id, "on_error", || observer.on_error(err, None));
                        return;
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

        if !signal.sleep(wait).await {
            return;
        }
    }
}
