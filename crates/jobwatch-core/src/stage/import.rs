use std::fmt;

use super::{normalized, StageMapper};
use crate::job::JobStatus;

/// Phases of a CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportStage {
    Uploading,
    Parsing,
    Validating,
    Importing,
    Finishing,
    Failed,
    Cancelled,
}

impl ImportStage {
    pub fn label(self) -> &'static str {
        match self {
            ImportStage::Uploading => "uploading",
            ImportStage::Parsing => "parsing",
            ImportStage::Validating => "validating",
            ImportStage::Importing => "importing",
            ImportStage::Finishing => "finishing",
            ImportStage::Failed => "failed",
            ImportStage::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Running progress: below 30% parsing, below 60% validating, then importing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportStages;

impl StageMapper for ImportStages {
    type Stage = ImportStage;

    fn stage(&self, status: JobStatus, progress: f64) -> ImportStage {
        match status {
            JobStatus::Pending => ImportStage::Uploading,
            JobStatus::Running => {
                let p = normalized(progress);
                if p < 30.0 {
                    ImportStage::Parsing
                } else if p < 60.0 {
                    ImportStage::Validating
                } else {
                    ImportStage::Importing
                }
            }
            JobStatus::Completed => ImportStage::Finishing,
            JobStatus::Failed => ImportStage::Failed,
            JobStatus::Cancelled => ImportStage::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_thresholds() {
        let m = ImportStages;
        assert_eq!(m.stage(JobStatus::Running, 0.0), ImportStage::Parsing);
        assert_eq!(m.stage(JobStatus::Running, 29.9), ImportStage::Parsing);
        assert_eq!(m.stage(JobStatus::Running, 30.0), ImportStage::Validating);
        assert_eq!(m.stage(JobStatus::Running, 59.9), ImportStage::Validating);
        assert_eq!(m.stage(JobStatus::Running, 60.0), ImportStage::Importing);
        assert_eq!(m.stage(JobStatus::Running, 100.0), ImportStage::Importing);
    }

    #[test]
    fn non_running_statuses() {
        let m = ImportStages;
        assert_eq!(m.stage(JobStatus::Pending, 80.0), ImportStage::Uploading);
        assert_eq!(m.stage(JobStatus::Completed, 100.0), ImportStage::Finishing);
        assert_eq!(m.stage(JobStatus::Failed, 45.0), ImportStage::Failed);
        assert_eq!(m.stage(JobStatus::Cancelled, 45.0), ImportStage::Cancelled);
    }

    #[test]
    fn stages_follow_progress_order() {
        let m = ImportStages;
        let mut prev = m.stage(JobStatus::Running, 0.0);
        for p in (0..=100).map(f64::from) {
            let s = m.stage(JobStatus::Running, p);
            assert!(s >= prev, "stage went backwards at {p}%");
            prev = s;
        }
    }

    #[test]
    fn odd_progress_values_still_map() {
        let m = ImportStages;
        assert_eq!(m.stage(JobStatus::Running, f64::NAN), ImportStage::Parsing);
        assert_eq!(m.stage(JobStatus::Running, 250.0), ImportStage::Importing);
        assert_eq!(m.stage(JobStatus::Running, -1.0), ImportStage::Parsing);
        assert_eq!(ImportStage::Validating.to_string(), "validating");
    }
}
