//! Crate error type.
//!
//! Only run-level failures are errors. Skipped input records are reported
//! as [`RecordIssue`]s and a demand without a feasible window is an explicit
//! [`Placement::Unplaced`](crate::models::Placement::Unplaced) value; neither
//! aborts a run. Errors raised after ingestion still carry the skipped
//! records, see [`SchedulerError::skipped`].

use crate::ingest::RecordIssue;
use crate::precheck::CapacityReport;

/// Result type for engine operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors that abort a scheduling run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    #[error("No usable rooms in input ({} records skipped)", skipped.len())]
    NoRooms { skipped: Vec<RecordIssue> },

    #[error("No usable weekly time windows in input ({} records skipped)", skipped.len())]
    NoTimeWindows { skipped: Vec<RecordIssue> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient capacity: {0}")]
    CapacityInsufficient(CapacityReport),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl SchedulerError {
    /// Shortfall report, if this is a capacity failure.
    pub fn capacity_report(&self) -> Option<&CapacityReport> {
        match self {
            SchedulerError::CapacityInsufficient(report) => Some(report),
            _ => None,
        }
    }

    /// Input records skipped before the run failed. Empty for errors raised
    /// before ingestion.
    pub fn skipped(&self) -> &[RecordIssue] {
        match self {
            SchedulerError::NoRooms { skipped } | SchedulerError::NoTimeWindows { skipped } => skipped,
            SchedulerError::CapacityInsufficient(report) => &report.skipped,
            SchedulerError::InvalidConfig(_) | SchedulerError::Unexpected(_) => &[],
        }
    }
}
