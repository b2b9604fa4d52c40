//! Hooks through which a live poll session reports to its caller.
//!
//! Two shapes are offered: the `PollObserver` trait (or its closure-backed
//! `Callbacks`), and a channel of `PollEvent`s via `ChannelObserver`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::error::{CallbackError, PollError};
use crate::job::{Job, JobId};

/// Receives updates from a live poll session.
///
/// Every hook defaults to a no-op. A hook that returns `Err` or panics is
/// contained and logged; it never ends the session. `on_complete` and
/// `on_error` are each called at most once and nothing follows them.
pub trait PollObserver: Send + Sync {
    /// Every successfully fetched snapshot, terminal ones included.
    fn on_update(&self, _job: &Job) -> Result<()> {
        Ok(())
    }

    fn on_complete(&self, _job: &Job) -> Result<()> {
        Ok(())
    }

    /// `job` is the last snapshot when the failure came from one (failed,
    /// cancelled, timed out) and `None` when the fetches themselves failed.
    fn on_error(&self, _error: PollError, _job: Option<&Job>) -> Result<()> {
        Ok(())
    }

    /// True once nobody is listening any more; the session then stops
    /// instead of polling into the void.
    fn is_closed(&self) -> bool {
        false
    }
}

impl<O: PollObserver + ?Sized> PollObserver for Arc<O> {
    fn on_update(&self, job: &Job) -> Result<()> {
        (**self).on_update(job)
    }

    fn on_complete(&self, job: &Job) -> Result<()> {
        (**self).on_complete(job)
    }

    fn on_error(&self, error: PollError, job: Option<&Job>) -> Result<()> {
        (**self).on_error(error, job)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

type JobHook = Box<dyn Fn(&Job) + Send + Sync>;
type ErrorHook = Box<dyn Fn(PollError, Option<&Job>) + Send + Sync>;

/// Closure-backed observer; unset hooks do nothing.
#[derive(Default)]
pub struct Callbacks {
    update: Option<JobHook>,
    complete: Option<JobHook>,
    error: Option<ErrorHook>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_update(mut self, f: impl Fn(&Job) + Send + Sync + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn(&Job) + Send + Sync + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(PollError, Option<&Job>) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }
}

impl PollObserver for Callbacks {
    fn on_update(&self, job: &Job) -> Result<()> {
        if let Some(f) = &self.update {
            f(job);
        }
        Ok(())
    }

    fn on_complete(&self, job: &Job) -> Result<()> {
        if let Some(f) = &self.complete {
            f(job);
        }
        Ok(())
    }

    fn on_error(&self, error: PollError, job: Option<&Job>) -> Result<()> {
        if let Some(f) = &self.error {
            f(error, job);
        }
        Ok(())
    }
}

/// One notification from a live poll session.
#[derive(Debug)]
pub enum PollEvent {
    Update(Job),
    Complete(Job),
    Error(PollError, Option<Job>),
}

impl PollEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollEvent::Update(_))
    }
}

/// Forwards every hook as a `PollEvent` on an unbounded channel. The channel
/// closes when the session ends; dropping the receiver ends the session.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<PollEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PollEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PollEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow::anyhow!("poll event receiver dropped"))
    }
}

impl PollObserver for ChannelObserver {
    fn on_update(&self, job: &Job) -> Result<()> {
        self.send(PollEvent::Update(job.clone()))
    }

    fn on_complete(&self, job: &Job) -> Result<()> {
        self.send(PollEvent::Complete(job.clone()))
    }

    fn on_error(&self, error: PollError, job: Option<&Job>) -> Result<()> {
        self.send(PollEvent::Error(error, job.cloned()))
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Runs one hook with error and panic containment.
pub(crate) fn contain<F>(job_id: &JobId, hook: &'static str, f: F)
where
    F: FnOnce() -> Result<()>,
{
    let message = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => return,
        Ok(Err(e)) => format!("{:#}", e),
        Err(payload) => panic_message(payload.as_ref()),
    };
    let err = CallbackError {
        job_id: job_id.clone(),
        hook,
        message,
    };
    tracing::warn!(job_id = %job_id, hook, "{}", err);
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
