//! `jobwatch wait <id>` – block until the job ends and print its result.

use anyhow::Result;
use jobwatch_core::fetch::JobApi;
use jobwatch_core::job::JobId;
use jobwatch_core::poll::{self, PollConfig};
use serde_json::Value;

pub async fn run_wait(api: &dyn JobApi, id: &JobId, config: &PollConfig) -> Result<()> {
    let job = poll::wait_for_job(api, id, config).await?;
    let result = job.result.unwrap_or(Value::Null);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
