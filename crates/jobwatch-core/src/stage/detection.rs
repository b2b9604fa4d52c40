use std::fmt;

use super::{normalized, StageMapper};
use crate::job::JobStatus;

/// Phases of transfer and recurring-transaction detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DetectionStage {
    Queued,
    Scanning,
    Matching,
    Done,
    Failed,
    Cancelled,
}

impl DetectionStage {
    pub fn label(self) -> &'static str {
        match self {
            DetectionStage::Queued => "queued",
            DetectionStage::Scanning => "scanning",
            DetectionStage::Matching => "matching",
            DetectionStage::Done => "done",
            DetectionStage::Failed => "failed",
            DetectionStage::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DetectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Running progress below 50% is scanning transactions, the rest matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionStages;

impl StageMapper for DetectionStages {
    type Stage = DetectionStage;

    fn stage(&self, status: JobStatus, progress: f64) -> DetectionStage {
        match status {
            JobStatus::Pending => DetectionStage::Queued,
            JobStatus::Running if normalized(progress) < 50.0 => DetectionStage::Scanning,
            JobStatus::Running => DetectionStage::Matching,
            JobStatus::Completed => DetectionStage::Done,
            JobStatus::Failed => DetectionStage::Failed,
            JobStatus::Cancelled => DetectionStage::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_status() {
        let m = DetectionStages;
        assert_eq!(m.stage(JobStatus::Pending, 0.0), DetectionStage::Queued);
        assert_eq!(m.stage(JobStatus::Running, 49.0), DetectionStage::Scanning);
        assert_eq!(m.stage(JobStatus::Running, 50.0), DetectionStage::Matching);
        assert_eq!(m.stage(JobStatus::Completed, 100.0), DetectionStage::Done);
        assert_eq!(m.stage(JobStatus::Failed, 10.0), DetectionStage::Failed);
        assert_eq!(m.stage(JobStatus::Cancelled, 10.0), DetectionStage::Cancelled);
    }
}
