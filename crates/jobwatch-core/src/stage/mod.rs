//! Stage mappers: turn raw `(status, progress)` into a phase a person can
//! read ("parsing", "importing", ...).
//!
//! Mappers are pure and total. Progress outside 0–100 is clamped and a
//! non-finite progress counts as 0, so every reachable pair maps to exactly
//! one stage.

mod detection;
mod import;
mod recategorize;

pub use detection::{DetectionStage, DetectionStages};
pub use import::{ImportStage, ImportStages};
pub use recategorize::{RecategorizeStage, RecategorizeStages};

use std::fmt;

use crate::job::{Job, JobStatus};

/// Consumer-specific mapping from job state to a display stage.
pub trait StageMapper {
    type Stage: Copy + fmt::Display;

    fn stage(&self, status: JobStatus, progress: f64) -> Self::Stage;

    fn stage_of(&self, job: &Job) -> Self::Stage {
        self.stage(job.status, job.progress)
    }
}

/// Progress clamped to 0–100; NaN and infinities become 0.
pub(crate) fn normalized(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_clamps_and_zeroes_non_finite() {
        assert_eq!(normalized(-5.0), 0.0);
        assert_eq!(normalized(150.0), 100.0);
        assert_eq!(normalized(f64::NAN), 0.0);
        assert_eq!(normalized(f64::INFINITY), 0.0);
        assert_eq!(normalized(42.5), 42.5);
    }
}
