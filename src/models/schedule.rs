//! Timetable (solution) model.
//!
//! A [`Candidate`] is one complete proposed timetable: the fixed part
//! (locked sessions and blackout activities, shared between all candidates
//! of a run) followed by one [`Assignment`] per unlocked demand, in
//! ingestion order. Placement failure is an explicit [`Placement::Unplaced`]
//! value, never a magic room or time string.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{CourseKind, CurriculumType, Session, TimeSlot, Weekday};

/// Where a session ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Bound to slots and, unless it is a blackout activity, a room.
    Placed {
        room: Option<String>,
        slots: Vec<TimeSlot>,
    },
    /// No feasible window was found for the required hours.
    Unplaced { hours: u8 },
}

impl Placement {
    /// Occupied slots (empty when unplaced).
    pub fn slots(&self) -> &[TimeSlot] {
        match self {
            Placement::Placed { slots, .. } => slots,
            Placement::Unplaced { .. } => &[],
        }
    }

    /// Room, if placed in one.
    pub fn room(&self) -> Option<&str> {
        match self {
            Placement::Placed { room, .. } => room.as_deref(),
            Placement::Unplaced { .. } => None,
        }
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed { .. })
    }
}

/// How an assignment came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Pre-fixed session, never moved.
    Locked,
    /// Global blackout activity.
    Blocking,
    /// Placed by construction or mutation.
    Generated,
}

/// A session bound to a placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The scheduled session (shared, immutable).
    pub session: Arc<Session>,
    /// Provenance.
    pub origin: Origin,
    /// Result of placement.
    pub placement: Placement,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(session: Arc<Session>, origin: Origin, placement: Placement) -> Self {
        Self {
            session,
            origin,
            placement,
        }
    }

    /// Whether the search may replace this assignment.
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.origin == Origin::Generated
    }

    /// Occupied (room, slot) pairs.
    pub fn room_slots(&self) -> impl Iterator<Item = (&str, &TimeSlot)> {
        let room = self.placement.room();
        self.placement
            .slots()
            .iter()
            .filter_map(move |s| room.map(|r| (r, s)))
    }
}

/// One complete proposed timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Locked sessions and blackout activities, shared across a run.
    pub fixed: Arc<[Assignment]>,
    /// One assignment per unlocked demand, index-aligned with the demands.
    pub generated: Vec<Assignment>,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(fixed: Arc<[Assignment]>, generated: Vec<Assignment>) -> Self {
        Self { fixed, generated }
    }

    /// All assignments: fixed first, then generated.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.fixed.iter().chain(self.generated.iter())
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.fixed.len() + self.generated.len()
    }

    /// Generated assignments that found no window.
    pub fn unplaced(&self) -> impl Iterator<Item = &Assignment> {
        self.generated.iter().filter(|a| !a.placement.is_placed())
    }

    /// Number of unplaced generated assignments.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced().count()
    }

    /// Flattens into one row per placed hour, sorted by course code,
    /// day, then hour.
    pub fn to_rows(&self) -> Vec<ScheduleRow> {
        let mut rows: Vec<ScheduleRow> = self
            .assignments()
            .flat_map(|a| {
                a.placement
                    .slots()
                    .iter()
                    .map(move |slot| ScheduleRow::from_assignment(a, *slot))
            })
            .collect();
        rows.sort_by(|a, b| {
            a.course_code
                .cmp(&b.course_code)
                .then(a.day.cmp(&b.day))
                .then(a.hour.cmp(&b.hour))
        });
        rows
    }
}

/// Kind column of an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Theory,
    Lab,
    Activity,
}

impl From<CourseKind> for SessionKind {
    fn from(kind: CourseKind) -> Self {
        match kind {
            CourseKind::Theory => SessionKind::Theory,
            CourseKind::Lab => SessionKind::Lab,
        }
    }
}

/// One scheduled hour, the engine's only output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Demand name (e.g. `CS101_sec1_lab`) or activity name.
    pub course_code: String,
    pub subject_name: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub room_type: Option<String>,
    pub kind: SessionKind,
    pub curriculum: Option<CurriculumType>,
    pub day: Weekday,
    pub hour: u8,
}

impl ScheduleRow {
    fn from_assignment(a: &Assignment, slot: TimeSlot) -> Self {
        let (subject_name, room_type, kind) = match a.session.as_ref() {
            Session::Course(d) => (d.subject_name.clone(), Some(d.room_type.clone()), SessionKind::from(d.kind)),
            Session::Activity(act) => (act.name.clone(), None, SessionKind::Activity),
        };
        Self {
            course_code: a.session.name().to_string(),
            subject_name,
            teacher: a.session.teacher().map(str::to_string),
            room: a.placement.room().map(str::to_string),
            room_type,
            kind,
            curriculum: a.session.curriculum(),
            day: slot.day,
            hour: slot.hour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockingActivity, CourseDemand};

    fn course(code: &str, kind: CourseKind) -> Arc<Session> {
        Arc::new(Session::Course(
            CourseDemand::new(code, 1, kind, "lecture", CurriculumType::Regular, 2).with_teacher("Ann"),
        ))
    }

    fn sample_candidate() -> Candidate {
        let fixed: Arc<[Assignment]> = vec![Assignment::new(
            Arc::new(Session::Activity(BlockingActivity::new("Exams", Weekday::Friday, 8, 9))),
            Origin::Blocking,
            Placement::Placed {
                room: None,
                slots: vec![TimeSlot::new(Weekday::Friday, 8)],
            },
        )]
        .into();
        let generated = vec![
            Assignment::new(
                course("CS101", CourseKind::Theory),
                Origin::Generated,
                Placement::Placed {
                    room: Some("A101".into()),
                    slots: vec![TimeSlot::new(Weekday::Tuesday, 9), TimeSlot::new(Weekday::Monday, 8)],
                },
            ),
            Assignment::new(course("AB100", CourseKind::Lab), Origin::Generated, Placement::Unplaced { hours: 2 }),
        ];
        Candidate::new(fixed, generated)
    }

    #[test]
    fn test_placement_accessors() {
        let p = Placement::Placed {
            room: Some("A101".into()),
            slots: vec![TimeSlot::new(Weekday::Monday, 8)],
        };
        assert!(p.is_placed());
        assert_eq!(p.room(), Some("A101"));
        let u = Placement::Unplaced { hours: 3 };
        assert!(!u.is_placed());
        assert!(u.slots().is_empty());
        assert!(u.room().is_none());
    }

    #[test]
    fn test_candidate_counts() {
        let c = sample_candidate();
        assert_eq!(c.assignment_count(), 3);
        assert_eq!(c.unplaced_count(), 1);
        assert!(c.generated[0].is_movable());
        assert!(!c.fixed[0].is_movable());
    }

    #[test]
    fn test_room_slots_skip_roomless() {
        let c = sample_candidate();
        assert_eq!(c.fixed[0].room_slots().count(), 0);
        assert_eq!(c.generated[0].room_slots().count(), 2);
    }

    #[test]
    fn test_rows_sorted_and_skip_unplaced() {
        let rows = sample_candidate().to_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].course_code, "CS101_sec1");
        assert_eq!(rows[0].day, Weekday::Monday);
        assert_eq!(rows[1].day, Weekday::Tuesday);
        assert_eq!(rows[2].course_code, "Exams");
        assert_eq!(rows[2].kind, SessionKind::Activity);
        assert!(rows[2].room.is_none());
        assert!(rows.iter().all(|r| r.course_code != "AB100_sec1_lab"));
    }
}
