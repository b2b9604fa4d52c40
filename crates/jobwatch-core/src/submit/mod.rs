//! Submission wrappers for the four job-capable operations.
//!
//! Every operation goes through `submit`, so CSV import, transfer
//! detection, recurring detection and recategorization all normalize sync
//! and job-based replies into the same `Submission` shape.

mod error;
mod operation;
mod outcome;
mod run;

pub use error::SubmitError;
pub use operation::{
    DetectRecurringRequest, DetectTransfersRequest, ImportCsvRequest, Operation,
    RecategorizeRequest,
};
pub use outcome::Submission;
pub use run::{
    detect_recurring, detect_transfers, import_csv, recategorize, submit, ProgressFn, SubmitMode,
};
