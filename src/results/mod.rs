//! Run validation and reporting module
//!
//! Accumulates per-test timings, renders the verdict and stores the report.

mod storage;
mod validation;

pub use storage::{report_path, write_report, ValidationReport};
pub use validation::{RunStatistics, RunningValidation, ValidationAccumulator, Verdict};
