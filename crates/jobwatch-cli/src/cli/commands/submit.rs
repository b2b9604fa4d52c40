//! `jobwatch submit <operation> --body <file|->` – start an operation.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use jobwatch_core::fetch::JobApi;
use jobwatch_core::poll::PollConfig;
use jobwatch_core::submit::{
    self, DetectRecurringRequest, DetectTransfersRequest, ImportCsvRequest, Operation,
    RecategorizeRequest, SubmitMode,
};

use crate::cli::{progress_line, ModeArg};

pub async fn run_submit<A>(
    api: &Arc<A>,
    operation: Operation,
    body: &str,
    mode: ModeArg,
    config: PollConfig,
) -> Result<()>
where
    A: JobApi + 'static,
{
    let raw = read_body(body)?;
    let mode = match mode {
        ModeArg::Fire => SubmitMode::FireAndForget,
        ModeArg::Wait => SubmitMode::Blocking(config),
        ModeArg::Watch => SubmitMode::observed(config, |job| println!("{}", progress_line(job, None))),
    };

    let parse_err = || format!("parse {operation} request body");
    let out = match operation {
        Operation::ImportCsv => {
            let req: ImportCsvRequest = serde_json::from_str(&raw).with_context(parse_err)?;
            submit::import_csv(api, &req, mode).await?
        }
        Operation::DetectTransfers => {
            let req: DetectTransfersRequest = serde_json::from_str(&raw).with_context(parse_err)?;
            submit::detect_transfers(api, &req, mode).await?
        }
        Operation::DetectRecurring => {
            let req: DetectRecurringRequest = serde_json::from_str(&raw).with_context(parse_err)?;
            submit::detect_recurring(api, &req, mode).await?
        }
        Operation::Recategorize => {
            let req: RecategorizeRequest = serde_json::from_str(&raw).with_context(parse_err)?;
            submit::recategorize(api, &req, mode).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&out.to_json())?);
    Ok(())
}

/// Body text from a file, or stdin for `-`.
fn read_body(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read request body from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(source))
        .with_context(|| format!("read request body {source}"))
}
