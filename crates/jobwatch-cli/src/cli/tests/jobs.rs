//! Tests for status, wait, watch and cancel.

use super::{parse, parse_full};
use clap::Parser;
use crate::cli::{progress_line, CliCommand, StageKind};
use jobwatch_core::job::{Job, JobId, JobStatus};

#[test]
fn cli_parse_status() {
    match parse(&["jobwatch", "status", "42"]) {
        CliCommand::Status { id, stages } => {
            assert_eq!(id, JobId::Int(42));
            assert!(stages.is_none());
        }
        _ => panic!("expected Status"),
    }
}

#[test]
fn cli_parse_text_job_id() {
    match parse(&["jobwatch", "wait", "imp-7f3a"]) {
        CliCommand::Wait { id } => assert_eq!(id, JobId::Text("imp-7f3a".to_string())),
        _ => panic!("expected Wait"),
    }
}

#[test]
fn cli_parse_watch_defaults() {
    match parse(&["jobwatch", "watch", "9"]) {
        CliCommand::Watch {
            id,
            stages,
            cancel_on_interrupt,
        } => {
            assert_eq!(id, JobId::Int(9));
            assert!(stages.is_none());
            assert!(!cancel_on_interrupt);
        }
        _ => panic!("expected Watch"),
    }
}

#[test]
fn cli_parse_watch_with_stages_and_cancel() {
    match parse(&[
        "jobwatch",
        "watch",
        "9",
        "--stages",
        "import",
        "--cancel-on-interrupt",
    ]) {
        CliCommand::Watch {
            stages,
            cancel_on_interrupt,
            ..
        } => {
            assert_eq!(stages, Some(StageKind::Import));
            assert!(cancel_on_interrupt);
        }
        _ => panic!("expected Watch"),
    }
}

#[test]
fn cli_parse_cancel() {
    match parse(&["jobwatch", "cancel", "5"]) {
        CliCommand::Cancel { id } => assert_eq!(id, JobId::Int(5)),
        _ => panic!("expected Cancel"),
    }
}

#[test]
fn cli_rejects_missing_id() {
    assert!(crate::cli::Cli::try_parse_from(["jobwatch", "wait"]).is_err());
}

#[test]
fn poll_overrides_are_global() {
    let cli = parse_full(&[
        "jobwatch",
        "watch",
        "3",
        "--max-retries",
        "5",
        "--initial-interval-ms",
        "250",
        "--base-url",
        "http://finance.local/api/",
    ]);
    assert_eq!(cli.base_url.as_deref(), Some("http://finance.local/api/"));
    let settings = cli.poll.to_settings();
    assert_eq!(settings.max_retries, Some(5));
    assert_eq!(settings.initial_interval_ms, Some(250));
    assert!(settings.timeout_ms.is_none());
    assert!(settings.backoff_multiplier.is_none());
}

#[test]
fn progress_line_includes_stage_and_message() {
    let job = Job::new(42, JobStatus::Running, 45.0).with_message("checking rows");
    assert_eq!(
        progress_line(&job, Some(StageKind::Import)),
        "job 42: running 45% [validating] checking rows"
    );
    assert_eq!(progress_line(&job, None), "job 42: running 45% checking rows");
}
