//! `jobwatch status <id>` – fetch a job's status once.

use anyhow::{Context, Result};
use jobwatch_core::fetch::JobApi;
use jobwatch_core::job::JobId;

use crate::cli::{progress_line, StageKind};

pub async fn run_status(api: &dyn JobApi, id: &JobId, stages: Option<StageKind>) -> Result<()> {
    let job = api
        .fetch_job(id)
        .await
        .with_context(|| format!("fetch status of job {id}"))?;
    println!("{}", progress_line(&job, stages));
    if let Some(err) = job.error.as_deref() {
        println!("error: {err}");
    }
    Ok(())
}
