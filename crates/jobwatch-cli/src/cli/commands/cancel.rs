//! `jobwatch cancel <id>` – ask the server to abort a job.

use anyhow::{Context, Result};
use jobwatch_core::fetch::JobApi;
use jobwatch_core::job::JobId;

pub async fn run_cancel(api: &dyn JobApi, id: &JobId) -> Result<()> {
    api.cancel_job(id)
        .await
        .with_context(|| format!("cancel job {id}"))?;
    tracing::info!(job_id = %id, "cancel requested");
    println!("Cancel requested for job {id}");
    Ok(())
}
