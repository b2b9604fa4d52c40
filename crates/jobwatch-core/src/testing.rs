//! Scripted `JobApi` for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::fetch::{BoxFuture, FetchError, JobApi};
use crate::job::{Job, JobId, JobStatus};

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Job(Job),
    /// Fetch fails with this HTTP status.
    Fail(u32),
}

impl Step {
    pub(crate) fn job(id: i64, status: JobStatus, progress: f64) -> Self {
        Step::Job(Job::new(id, status, progress))
    }

    fn into_result(self) -> Result<Job, FetchError> {
        match self {
            Step::Job(job) => Ok(job),
            Step::Fail(code) => Err(FetchError::Http(code)),
        }
    }
}

/// Plays back status snapshots in order; once the script runs out the last
/// step repeats. POST replies are played back the same way.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    fetches: Mutex<Vec<Instant>>,
    delay: Duration,
    replies: Mutex<VecDeque<Result<Value, u32>>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl ScriptedApi {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            ..Self::default()
        }
    }

    pub(crate) fn repeating(step: Step) -> Self {
        Self::new(vec![step])
    }

    /// Each fetch takes `delay` (on the Tokio clock) before returning.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn with_replies(self, replies: Vec<Result<Value, u32>>) -> Self {
        *self.replies.lock().unwrap() = replies.into();
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    /// Instants at which each fetch started.
    pub(crate) fn fetch_times(&self) -> Vec<Instant> {
        self.fetches.lock().unwrap().clone()
    }

    pub(crate) fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let next = self.steps.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(step) => {
                *last = Some(step.clone());
                step
            }
            None => last.clone().expect("ScriptedApi has no steps"),
        }
    }
}

impl JobApi for ScriptedApi {
    fn fetch_job<'a>(&'a self, _id: &'a JobId) -> BoxFuture<'a, Result<Job, FetchError>> {
        Box::pin(async move {
            self.fetches.lock().unwrap().push(Instant::now());
            let step = self.next_step();
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            step.into_result()
        })
    }

    fn cancel_job<'a>(&'a self, _id: &'a JobId) -> BoxFuture<'a, Result<(), FetchError>> {
        Box::pin(async { Ok(()) })
    }

    fn post_json<'a>(
        &'a self,
        path: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, FetchError>> {
        Box::pin(async move {
            self.posts
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(v)) => Ok(v),
                Some(Err(code)) => Err(FetchError::Http(code)),
                None => Ok(Value::Object(Default::default())),
            }
        })
    }
}
