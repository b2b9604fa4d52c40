use std::fmt;

use super::StageMapper;
use crate::job::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecategorizeStage {
    Queued,
    Recategorizing,
    Done,
    Failed,
    Cancelled,
}

impl fmt::Display for RecategorizeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecategorizeStage::Queued => "queued",
            RecategorizeStage::Recategorizing => "recategorizing",
            RecategorizeStage::Done => "done",
            RecategorizeStage::Failed => "failed",
            RecategorizeStage::Cancelled => "cancelled",
        })
    }
}

/// Recategorization has a single running phase; progress is not split.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecategorizeStages;

impl StageMapper for RecategorizeStages {
    type Stage = RecategorizeStage;

    fn stage(&self, status: JobStatus, _progress: f64) -> RecategorizeStage {
        match status {
            JobStatus::Pending => RecategorizeStage::Queued,
            JobStatus::Running => RecategorizeStage::Recategorizing,
            JobStatus::Completed => RecategorizeStage::Done,
            JobStatus::Failed => RecategorizeStage::Failed,
            JobStatus::Cancelled => RecategorizeStage::Cancelled,
        }
    }
}
