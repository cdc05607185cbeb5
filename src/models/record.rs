//! Raw boundary records.
//!
//! The engine receives plain in-memory collections from a record store it
//! does not own. These structs mirror those rows before validation; the
//! `ingest` module turns them into demands, locks and blackouts.

use serde::{Deserialize, Serialize};

use super::{CourseKind, CurriculumType, Weekday};

/// A course offered by a teacher: `section_count` sections, each needing
/// `theory_hours` and/or `lab_hours` contiguous hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseRecord {
    pub teacher: Option<String>,
    pub subject_code: String,
    pub subject_name: String,
    pub curriculum: CurriculumType,
    pub room_type: String,
    pub section_count: u32,
    pub theory_hours: u8,
    pub lab_hours: u8,
}

impl CourseRecord {
    /// Creates a one-section record.
    pub fn new(subject_code: impl Into<String>, room_type: impl Into<String>) -> Self {
        Self {
            subject_code: subject_code.into(),
            room_type: room_type.into(),
            section_count: 1,
            ..Self::default()
        }
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    pub fn with_curriculum(mut self, curriculum: CurriculumType) -> Self {
        self.curriculum = curriculum;
        self
    }

    pub fn with_sections(mut self, count: u32) -> Self {
        self.section_count = count;
        self
    }

    pub fn with_theory_hours(mut self, hours: u8) -> Self {
        self.theory_hours = hours;
        self
    }

    pub fn with_lab_hours(mut self, hours: u8) -> Self {
        self.lab_hours = hours;
        self
    }
}

/// A pre-fixed session row.
///
/// `kind` may be absent in older data; it is then inferred from the hour
/// columns (lab iff only lab hours are given).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockedRecord {
    pub teacher: Option<String>,
    pub subject_code: String,
    pub subject_name: String,
    pub curriculum: CurriculumType,
    pub room_type: String,
    pub kind: Option<CourseKind>,
    pub theory_hours: u8,
    pub lab_hours: u8,
    /// Declared hours; checked against `stop_hour - start_hour`.
    pub hours: Option<u8>,
    pub day: Option<Weekday>,
    pub start_hour: Option<u8>,
    pub stop_hour: Option<u8>,
    pub room: String,
}

impl LockedRecord {
    /// Creates a locked row of the given kind.
    pub fn new(
        subject_code: impl Into<String>,
        kind: CourseKind,
        day: Weekday,
        start_hour: u8,
        stop_hour: u8,
        room: impl Into<String>,
    ) -> Self {
        Self {
            subject_code: subject_code.into(),
            kind: Some(kind),
            day: Some(day),
            start_hour: Some(start_hour),
            stop_hour: Some(stop_hour),
            room: room.into(),
            ..Self::default()
        }
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    pub fn with_curriculum(mut self, curriculum: CurriculumType) -> Self {
        self.curriculum = curriculum;
        self
    }

    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    /// Clears the explicit kind and sets the hour columns instead.
    pub fn with_slot_hours(mut self, theory_hours: u8, lab_hours: u8) -> Self {
        self.kind = None;
        self.theory_hours = theory_hours;
        self.lab_hours = lab_hours;
        self
    }

    pub fn with_hours(mut self, hours: u8) -> Self {
        self.hours = Some(hours);
        self
    }
}

/// A blackout activity row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    pub name: String,
    pub day: Option<Weekday>,
    pub start_hour: Option<u8>,
    pub stop_hour: Option<u8>,
}

impl ActivityRecord {
    pub fn new(name: impl Into<String>, day: Weekday, start_hour: u8, stop_hour: u8) -> Self {
        Self {
            name: name.into(),
            day: Some(day),
            start_hour: Some(start_hour),
            stop_hour: Some(stop_hour),
        }
    }
}

/// A room row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRecord {
    pub name: String,
    pub room_type: String,
}

impl RoomRecord {
    pub fn new(name: impl Into<String>, room_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            room_type: room_type.into(),
        }
    }
}

/// A weekly teaching window row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindowRecord {
    pub day: Weekday,
    pub start_hour: u8,
    pub stop_hour: u8,
}

impl TimeWindowRecord {
    pub fn new(day: Weekday, start_hour: u8, stop_hour: u8) -> Self {
        Self {
            day,
            start_hour,
            stop_hour,
        }
    }
}

/// Everything one run needs, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleInput {
    pub time_windows: Vec<TimeWindowRecord>,
    pub rooms: Vec<RoomRecord>,
    pub courses: Vec<CourseRecord>,
    pub locked: Vec<LockedRecord>,
    pub activities: Vec<ActivityRecord>,
}

/// Parses a human-entered time into its hour.
///
/// Accepts `"13"`, `"8:30"`, `"08:00:00"`. Returns `None` for anything
/// that is not an hour in `0..=24`.
pub fn parse_hour(value: &str) -> Option<u8> {
    let head = value.trim().split(':').next()?.trim();
    let hour: u8 = head.parse().ok()?;
    (hour <= 24).then_some(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour("13"), Some(13));
        assert_eq!(parse_hour(" 08:30 "), Some(8));
        assert_eq!(parse_hour("17:00:00"), Some(17));
        assert_eq!(parse_hour("24"), Some(24));
        assert_eq!(parse_hour("25:00"), None);
        assert_eq!(parse_hour("noon"), None);
        assert_eq!(parse_hour(""), None);
    }

    #[test]
    fn test_course_record_builder() {
        let r = CourseRecord::new("CS101", "lecture")
            .with_teacher("Ann")
            .with_sections(2)
            .with_theory_hours(3)
            .with_lab_hours(2);
        assert_eq!(r.section_count, 2);
        assert_eq!(r.teacher.as_deref(), Some("Ann"));
        assert_eq!(r.curriculum, CurriculumType::Regular);
    }

    #[test]
    fn test_input_deserialize() {
        let json = r#"{
            "time_windows": [{"day": "monday", "start_hour": 8, "stop_hour": 12}],
            "rooms": [{"name": "A101", "room_type": "Lecture"}],
            "courses": [{"subject_code": "CS101", "room_type": "lecture", "section_count": 1, "theory_hours": 2}],
            "locked": [{"subject_code": "MA201", "kind": "lab", "day": "tuesday", "start_hour": 9, "stop_hour": 11, "room": "A101"}]
        }"#;
        let input: ScheduleInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.time_windows[0].day, Weekday::Monday);
        assert_eq!(input.courses[0].theory_hours, 2);
        assert_eq!(input.locked[0].kind, Some(CourseKind::Lab));
        assert!(input.activities.is_empty());
    }
}
