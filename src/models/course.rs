//! Teaching demand models.
//!
//! A course record expands into one [`CourseDemand`] per theory/lab part
//! per section. Demands already pinned to a day, hours and room become
//! [`LockedAssignment`]s. [`BlockingActivity`] is a global blackout (exam,
//! ceremony) that no room or teacher may use.
//!
//! # Naming
//! A demand is identified by its generated name:
//! `{subject_code}_sec{section}` for theory and `{subject_code}_sec{section}_lab`
//! for lab parts. Locked and generated demands share this namespace.

use serde::{Deserialize, Serialize};

use super::{CurriculumType, TimeSlot, TimeWindow, Weekday};

/// Theory or lab part of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseKind {
    Theory,
    Lab,
}

impl CourseKind {
    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            CourseKind::Theory => "theory",
            CourseKind::Lab => "lab",
        }
    }
}

/// Builds the identity name of a section part.
pub fn demand_name(subject_code: &str, section: u32, kind: CourseKind) -> String {
    match kind {
        CourseKind::Theory => format!("{subject_code}_sec{section}"),
        CourseKind::Lab => format!("{subject_code}_sec{section}_lab"),
    }
}

/// One schedulable unit: a theory or lab part of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDemand {
    /// Identity (e.g. `CS101_sec2_lab`).
    pub name: String,
    /// Subject code (e.g. `CS101`).
    pub subject_code: String,
    /// Human-readable subject name.
    pub subject_name: String,
    /// Section number within the subject code.
    pub section: u32,
    /// Teacher name. `None` = unstaffed, no teacher exclusivity.
    pub teacher: Option<String>,
    /// Theory or lab.
    pub kind: CourseKind,
    /// Required room type (normalized).
    pub room_type: String,
    /// Curriculum deciding legal hours.
    pub curriculum: CurriculumType,
    /// Contiguous hours needed.
    pub hours: u8,
}

impl CourseDemand {
    /// Creates a demand; the name is derived from code, section and kind.
    pub fn new(
        subject_code: impl Into<String>,
        section: u32,
        kind: CourseKind,
        room_type: impl Into<String>,
        curriculum: CurriculumType,
        hours: u8,
    ) -> Self {
        let subject_code = subject_code.into();
        Self {
            name: demand_name(&subject_code, section, kind),
            subject_name: subject_code.clone(),
            subject_code,
            section,
            teacher: None,
            kind,
            room_type: room_type.into(),
            curriculum,
            hours,
        }
    }

    /// Sets the subject name.
    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }
}

/// A demand fixed to a day, a contiguous hour range and a room.
///
/// Never moved by the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedAssignment {
    /// The pinned demand. `hours` equals the window length.
    pub demand: CourseDemand,
    /// Room the session is held in.
    pub room: String,
    /// Fixed weekly window.
    pub window: TimeWindow,
}

impl LockedAssignment {
    /// Occupied slots, in order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.window.slots()
    }
}

/// A global blackout interval (no room, no teacher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingActivity {
    /// Activity name (e.g. "midterm exams").
    pub name: String,
    /// Blocked weekly window.
    pub window: TimeWindow,
}

impl BlockingActivity {
    /// Creates a blocking activity.
    pub fn new(name: impl Into<String>, day: Weekday, start_hour: u8, stop_hour: u8) -> Self {
        Self {
            name: name.into(),
            window: TimeWindow::new(day, start_hour, stop_hour),
        }
    }

    /// Blocked slots, in order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.window.slots()
    }
}

/// What an assignment schedules: a course part or a blackout activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Course(CourseDemand),
    Activity(BlockingActivity),
}

impl Session {
    /// Identity name.
    pub fn name(&self) -> &str {
        match self {
            Session::Course(d) => &d.name,
            Session::Activity(a) => &a.name,
        }
    }

    /// Teacher, if any.
    pub fn teacher(&self) -> Option<&str> {
        match self {
            Session::Course(d) => d.teacher.as_deref(),
            Session::Activity(_) => None,
        }
    }

    /// Curriculum, if this is a course.
    pub fn curriculum(&self) -> Option<CurriculumType> {
        match self {
            Session::Course(d) => Some(d.curriculum),
            Session::Activity(_) => None,
        }
    }

    /// Underlying demand, if this is a course.
    pub fn demand(&self) -> Option<&CourseDemand> {
        match self {
            Session::Course(d) => Some(d),
            Session::Activity(_) => None,
        }
    }

    /// Whether this is a blackout activity.
    pub fn is_activity(&self) -> bool {
        matches!(self, Session::Activity(_))
    }
}
