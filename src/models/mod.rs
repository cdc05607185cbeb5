//! Timetabling domain models.
//!
//! Provides the core data types for a weekly course timetable: the
//! calendar grid, curriculum hour rules, rooms, teaching demands, per-room
//! slot pools, and the candidate timetables the search produces.
//!
//! # Domain Mappings
//!
//! | timetable-ga | Meaning |
//! |--------------|---------|
//! | TimeSlot | One hour of one weekday |
//! | CourseDemand | Theory or lab part of a section |
//! | LockedAssignment | Pre-fixed session |
//! | BlockingActivity | Global blackout (exams, ceremonies) |
//! | Candidate | Complete proposed timetable |

mod calendar;
mod course;
mod curriculum;
mod record;
mod room;
mod schedule;
mod slot_pool;

pub use calendar::{TimeSlot, TimeWindow, Weekday, WeeklyCalendar};
pub use course::{demand_name, BlockingActivity, CourseDemand, CourseKind, LockedAssignment, Session};
pub use curriculum::{CurriculumRules, CurriculumType, DayRule, HourRange};
pub use record::{
    parse_hour, ActivityRecord, CourseRecord, LockedRecord, RoomRecord, ScheduleInput, TimeWindowRecord,
};
pub use room::{normalize_room_type, Room};
pub use schedule::{Assignment, Candidate, Origin, Placement, ScheduleRow, SessionKind};
pub use slot_pool::SlotPool;
