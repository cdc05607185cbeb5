//! Weekly course timetabling.
//!
//! Builds a weekly timetable for course sections: every theory or lab part
//! gets a room of the right type and a contiguous block of legal hours,
//! without double-booking teachers or rooms and without touching blackout
//! periods. Candidates are constructed greedily and improved by a genetic
//! search.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Weekday`, `TimeSlot`, `WeeklyCalendar`,
//!   `CurriculumRules`, `Room`, `CourseDemand`, `SlotPool`, `Candidate`,
//!   and the raw input records
//! - **`ingest`**: Record validation, section numbering, demand expansion
//! - **`precheck`**: Fail-fast capacity check per (room type, curriculum)
//! - **`scheduler`**: Placement search, greedy constructor, fitness
//! - **`ga`**: Generic GA driver and the timetable encoding
//! - **`engine`**: `TimetableEngine`, the end-to-end entry point
//!
//! # Logging
//!
//! Progress and skipped records are reported through `tracing`. The crate
//! never installs a subscriber.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod config;
pub mod engine;
pub mod error;
pub mod ga;
pub mod ingest;
pub mod models;
pub mod precheck;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use engine::{ScheduleOutcome, TimetableEngine};
pub use error::{SchedulerError, SchedulerResult};
pub use ga::{CancelToken, GaConfig, StopReason};
pub use ingest::{RecordIssue, RecordIssueKind};
pub use precheck::{CapacityReport, CapacityShortfall, ShortfallKind};
pub use scheduler::FitnessWeights;
