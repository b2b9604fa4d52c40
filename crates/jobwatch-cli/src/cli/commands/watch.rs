//! `jobwatch watch <id>` – follow a job live until it ends or Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use jobwatch_core::fetch::JobApi;
use jobwatch_core::job::JobId;
use jobwatch_core::poll::{self, PollConfig, PollEvent, PollHandle};

use crate::cli::{progress_line, StageKind};

pub async fn run_watch<A>(
    api: Arc<A>,
    id: JobId,
    stages: Option<StageKind>,
    cancel_on_interrupt: bool,
    config: PollConfig,
) -> Result<()>
where
    A: JobApi + 'static,
{
    let (mut handle, mut events) = poll::watch_channel(Arc::clone(&api), id.clone(), config);
    let mut outcome = Ok(());

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(PollEvent::Update(job)) => println!("{}", progress_line(&job, stages)),
                Some(PollEvent::Complete(job)) => {
                    if let Some(result) = job.result.as_ref() {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }
                }
                Some(PollEvent::Error(err, _)) => outcome = Err(err),
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if handle.is_active() => {
                if stop_watching(api.as_ref(), &handle, &id, cancel_on_interrupt).await? {
                    println!("Stopped watching; cancel requested for job {id}");
                } else {
                    println!("Stopped watching job {id}; it keeps running on the server");
                }
            }
        }
    }

    handle.finished().await;
    outcome.map_err(Into::into)
}

/// Ends local polling and, when asked, the server-side job too.
/// Returns true if a cancel was posted.
pub(crate) async fn stop_watching<A>(
    api: &A,
    handle: &PollHandle,
    id: &JobId,
    cancel_on_interrupt: bool,
) -> Result<bool>
where
    A: JobApi + ?Sized,
{
    handle.stop();
    if !cancel_on_interrupt {
        return Ok(false);
    }
    api.cancel_job(id)
        .await
        .with_context(|| format!("cancel job {id}"))?;
    tracing::info!(job_id = %id, "cancel requested on interrupt");
    Ok(true)
}
