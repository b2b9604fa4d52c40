//! CLI for tracking background jobs on the finance server.

mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jobwatch_core::config::{self, PollSettings};
use jobwatch_core::fetch::HttpJobApi;
use jobwatch_core::job::{Job, JobId};
use jobwatch_core::stage::{DetectionStages, ImportStages, RecategorizeStages, StageMapper};
use jobwatch_core::submit::Operation;

use commands::{run_cancel, run_status, run_submit, run_wait, run_watch};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "jobwatch")]
#[command(about = "jobwatch: follow import, detection and recategorization jobs", long_about = None)]
pub struct Cli {
    /// Server API base URL (overrides `base_url` in config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(flatten)]
    pub poll: PollArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Polling overrides; unset flags keep the config file or built-in values.
#[derive(Debug, Clone, Default, Args)]
pub struct PollArgs {
    /// First wait between status fetches, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub initial_interval_ms: Option<u64>,
    /// Upper bound for the growing wait, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub max_interval_ms: Option<u64>,
    /// Growth factor for the wait after each poll.
    #[arg(long, global = true, value_name = "FACTOR")]
    pub backoff_multiplier: Option<f64>,
    /// Give up after this much accumulated waiting, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,
    /// Consecutive failed status fetches tolerated.
    #[arg(long, global = true, value_name = "N")]
    pub max_retries: Option<u32>,
}

impl PollArgs {
    pub fn to_settings(&self) -> PollSettings {
        PollSettings {
            initial_interval_ms: self.initial_interval_ms,
            max_interval_ms: self.max_interval_ms,
            backoff_multiplier: self.backoff_multiplier,
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a job's status once.
    Status {
        /// Job identifier.
        id: JobId,
        /// Also show the stage for this kind of job.
        #[arg(long, value_enum)]
        stages: Option<StageKind>,
    },

    /// Block until a job finishes and print its result.
    Wait {
        /// Job identifier.
        id: JobId,
    },

    /// Follow a job live, one line per status update.
    Watch {
        /// Job identifier.
        id: JobId,
        /// Show the stage for this kind of job.
        #[arg(long, value_enum)]
        stages: Option<StageKind>,
        /// On Ctrl-C, also ask the server to cancel the job.
        #[arg(long)]
        cancel_on_interrupt: bool,
    },

    /// Ask the server to cancel a job.
    Cancel {
        /// Job identifier.
        id: JobId,
    },

    /// Start an operation and print its normalized result.
    Submit {
        /// Operation to start.
        #[arg(value_enum)]
        operation: OperationArg,
        /// JSON request body file, or `-` for stdin.
        #[arg(long, value_name = "PATH")]
        body: String,
        /// What to do if the server answers with a job.
        #[arg(long, value_enum, default_value_t = ModeArg::Wait)]
        mode: ModeArg,
    },
}

/// Stage vocabulary used when printing progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageKind {
    Import,
    Detect,
    Recategorize,
}

impl StageKind {
    pub fn label(self, job: &Job) -> String {
        match self {
            StageKind::Import => ImportStages.stage_of(job).to_string(),
            StageKind::Detect => DetectionStages.stage_of(job).to_string(),
            StageKind::Recategorize => RecategorizeStages.stage_of(job).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Import,
    DetectTransfers,
    DetectRecurring,
    Recategorize,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Import => Operation::ImportCsv,
            OperationArg::DetectTransfers => Operation::DetectTransfers,
            OperationArg::DetectRecurring => Operation::DetectRecurring,
            OperationArg::Recategorize => Operation::Recategorize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Return the job id without waiting.
    Fire,
    /// Wait quietly for the job.
    Wait,
    /// Wait and print progress lines.
    Watch,
}

/// One progress line: `job 42: running 35% [validating] parsing rows`.
pub(crate) fn progress_line(job: &Job, stages: Option<StageKind>) -> String {
    let mut line = format!("job {}: {} {:.0}%", job.id, job.status, job.progress);
    if let Some(kind) = stages {
        line.push_str(&format!(" [{}]", kind.label(job)));
    }
    if let Some(msg) = job.message.as_deref().filter(|m| !m.is_empty()) {
        line.push(' ');
        line.push_str(msg);
    }
    line
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let base_url = cli.base_url.as_deref().unwrap_or(&cfg.base_url);
        let api = Arc::new(
            HttpJobApi::new(base_url, cfg.timeouts())
                .with_context(|| format!("invalid base URL {base_url}"))?,
        );
        let poll = cfg.poll_config(&cli.poll.to_settings())?;

        match cli.command {
            CliCommand::Status { id, stages } => run_status(api.as_ref(), &id, stages).await?,
            CliCommand::Wait { id } => run_wait(api.as_ref(), &id, &poll).await?,
            CliCommand::Watch {
                id,
                stages,
                cancel_on_interrupt,
            } => run_watch(api, id, stages, cancel_on_interrupt, poll).await?,
            CliCommand::Cancel { id } => run_cancel(api.as_ref(), &id).await?,
            CliCommand::Submit {
                operation,
                body,
                mode,
            } => run_submit(&api, operation.into(), &body, mode, poll).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
