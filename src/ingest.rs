//! Demand and lock ingestion.
//!
//! Turns raw boundary records into typed inputs for one run:
//! - rooms and weekly windows (validated, normalized)
//! - one [`CourseDemand`] per theory/lab part per section of each course
//! - [`LockedAssignment`]s with deterministic section numbers
//! - [`BlockingActivity`] blackouts
//!
//! Malformed records are skipped, never fatal. Every skip is collected as a
//! [`RecordIssue`] so callers can report them together.
//!
//! # Section numbering
//! Locked rows are numbered first, per subject code, walking teachers in
//! input order:
//! 1. every theory row of a teacher opens a new section;
//! 2. all lab rows of that teacher join the teacher's first theory section;
//! 3. a teacher with lab rows only gets one new section shared by all of them.
//!
//! Generated sections continue from the highest locked section of the same
//! subject code, so locked and generated names never collide.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::{
    demand_name, normalize_room_type, ActivityRecord, BlockingActivity, CourseDemand, CourseKind, CourseRecord,
    LockedAssignment, LockedRecord, Room, RoomRecord, ScheduleInput, TimeWindow, TimeWindowRecord,
};

/// A skipped input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// Issue category.
    pub kind: RecordIssueKind,
    /// Which record (e.g. `course #3 (CS101)`).
    pub record: String,
    /// Human-readable reason.
    pub message: String,
}

/// Categories of skipped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordIssueKind {
    /// Course or locked row without a subject code.
    MissingSubjectCode,
    /// Course or room without a room type.
    MissingRoomType,
    /// Room without a name, or locked row without a room.
    MissingRoom,
    /// Two rooms share a name.
    DuplicateRoom,
    /// Course with zero sections.
    NoSections,
    /// Course with neither theory nor lab hours.
    NoHours,
    /// Locked row or activity without day/start/stop.
    MissingTime,
    /// Window with start >= stop or stop past midnight.
    InvalidTimeRange,
}

impl RecordIssue {
    fn new(kind: RecordIssueKind, record: impl Into<String>, message: impl Into<String>) -> Self {
        let issue = Self {
            kind,
            record: record.into(),
            message: message.into(),
        };
        warn!(record = %issue.record, kind = ?issue.kind, "skipping record: {}", issue.message);
        issue
    }
}

/// Typed, validated inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub rooms: Vec<Room>,
    pub windows: Vec<TimeWindow>,
    /// Unlocked demands in ingestion order.
    pub demands: Vec<CourseDemand>,
    pub locked: Vec<LockedAssignment>,
    pub activities: Vec<BlockingActivity>,
    /// Every skipped record.
    pub issues: Vec<RecordIssue>,
}

/// Ingests every record kind of a run.
pub fn ingest(input: &ScheduleInput) -> Ingested {
    let mut issues = Vec::new();

    let rooms = ingest_rooms(&input.rooms, &mut issues);
    let windows = ingest_windows(&input.time_windows, &mut issues);
    let locked = ingest_locked(&input.locked, &rooms, &mut issues);
    let demands = expand_courses(&input.courses, &locked, &mut issues);
    let activities = ingest_activities(&input.activities, &mut issues);

    Ingested {
        rooms,
        windows,
        demands,
        locked,
        activities,
        issues,
    }
}

fn ingest_rooms(records: &[RoomRecord], issues: &mut Vec<RecordIssue>) -> Vec<Room> {
    let mut seen = HashSet::new();
    let mut rooms = Vec::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        let room = Room::new(r.name.as_str(), &r.room_type);
        let label = format!("room #{i} ({})", room.name);
        if room.name.is_empty() {
            issues.push(RecordIssue::new(RecordIssueKind::MissingRoom, label, "room has no name"));
        } else if room.room_type.is_empty() {
            issues.push(RecordIssue::new(RecordIssueKind::MissingRoomType, label, "room has no type"));
        } else if !seen.insert(room.name.clone()) {
            issues.push(RecordIssue::new(
                RecordIssueKind::DuplicateRoom,
                label,
                format!("duplicate room name '{}'", room.name),
            ));
        } else {
            rooms.push(room);
        }
    }
    rooms
}

fn ingest_windows(records: &[TimeWindowRecord], issues: &mut Vec<RecordIssue>) -> Vec<TimeWindow> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let w = TimeWindow::new(r.day, r.start_hour, r.stop_hour);
            if w.is_well_formed() {
                Some(w)
            } else {
                issues.push(RecordIssue::new(
                    RecordIssueKind::InvalidTimeRange,
                    format!("time window #{i} ({})", r.day),
                    format!("invalid hours {}..{}", r.start_hour, r.stop_hour),
                ));
                None
            }
        })
        .collect()
}

/// Validates day/start/stop of a row into a window.
fn parse_window(
    day: Option<crate::models::Weekday>,
    start: Option<u8>,
    stop: Option<u8>,
    label: &str,
    issues: &mut Vec<RecordIssue>,
) -> Option<TimeWindow> {
    let (Some(day), Some(start), Some(stop)) = (day, start, stop) else {
        issues.push(RecordIssue::new(RecordIssueKind::MissingTime, label, "day, start or stop hour missing"));
        return None;
    };
    let window = TimeWindow::new(day, start, stop);
    if !window.is_well_formed() {
        issues.push(RecordIssue::new(
            RecordIssueKind::InvalidTimeRange,
            label,
            format!("invalid hours {start}..{stop}"),
        ));
        return None;
    }
    Some(window)
}

fn normalize_teacher(teacher: Option<&String>) -> Option<String> {
    teacher.map(|t| t.trim()).filter(|t| !t.is_empty()).map(str::to_string)
}

/// Explicit kind, or inferred from the hour columns. `None` = ambiguous.
fn locked_kind(record: &LockedRecord) -> Option<CourseKind> {
    match record.kind {
        Some(kind) => Some(kind),
        None if record.lab_hours > 0 && record.theory_hours == 0 => Some(CourseKind::Lab),
        None if record.theory_hours > 0 => Some(CourseKind::Theory),
        None => None,
    }
}

/// A locked row that passed validation, awaiting its section number.
struct LockedRow<'a> {
    record: &'a LockedRecord,
    subject_code: String,
    teacher: Option<String>,
    kind: CourseKind,
    window: TimeWindow,
}

fn ingest_locked(records: &[LockedRecord], rooms: &[Room], issues: &mut Vec<RecordIssue>) -> Vec<LockedAssignment> {
    let mut rows = Vec::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        let subject_code = r.subject_code.trim().to_string();
        let label = format!("locked #{i} ({subject_code})");
        if subject_code.is_empty() {
            issues.push(RecordIssue::new(RecordIssueKind::MissingSubjectCode, label, "no subject code"));
            continue;
        }
        let Some(kind) = locked_kind(r) else {
            debug!(record = %label, "dropping locked row with no kind and no hours");
            continue;
        };
        if r.room.trim().is_empty() {
            issues.push(RecordIssue::new(RecordIssueKind::MissingRoom, label, "locked row has no room"));
            continue;
        }
        let Some(window) = parse_window(r.day, r.start_hour, r.stop_hour, &label, issues) else {
            continue;
        };
        if let Some(declared) = r.hours.filter(|&h| h != window.len_hours()) {
            warn!(
                record = %label,
                declared,
                actual = window.len_hours(),
                "locked hours disagree with time range; using the time range"
            );
        }
        rows.push(LockedRow {
            record: r,
            subject_code,
            teacher: normalize_teacher(r.teacher.as_ref()),
            kind,
            window,
        });
    }

    let sections = number_locked_sections(&rows);

    rows.iter()
        .zip(sections)
        .map(|(row, section)| {
            let room_name = row.record.room.trim().to_string();
            let mut room_type = normalize_room_type(&row.record.room_type);
            match rooms.iter().find(|room| room.name == room_name) {
                Some(room) if room_type.is_empty() => room_type = room.room_type.clone(),
                Some(_) => {}
                None => warn!(room = %room_name, subject = %row.subject_code, "locked session uses an unknown room"),
            }
            let subject_name = match row.record.subject_name.trim() {
                "" => row.subject_code.clone(),
                name => name.to_string(),
            };
            LockedAssignment {
                demand: CourseDemand {
                    name: demand_name(&row.subject_code, section, row.kind),
                    subject_code: row.subject_code.clone(),
                    subject_name,
                    section,
                    teacher: row.teacher.clone(),
                    kind: row.kind,
                    room_type,
                    curriculum: row.record.curriculum,
                    hours: row.window.len_hours(),
                },
                room: room_name,
                window: row.window,
            }
        })
        .collect()
}

/// Assigns section numbers to locked rows (index-aligned with `rows`).
fn number_locked_sections(rows: &[LockedRow<'_>]) -> Vec<u32> {
    let mut sections = vec![0u32; rows.len()];

    let mut subjects: Vec<&str> = Vec::new();
    for row in rows {
        if !subjects.contains(&row.subject_code.as_str()) {
            subjects.push(&row.subject_code);
        }
    }

    for subject in subjects {
        let in_subject: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].subject_code == subject).collect();

        let mut teachers: Vec<Option<&str>> = Vec::new();
        for &i in &in_subject {
            let t = rows[i].teacher.as_deref();
            if !teachers.contains(&t) {
                teachers.push(t);
            }
        }

        let mut counter = 0u32;
        for teacher in teachers {
            let of_teacher = in_subject.iter().copied().filter(|&i| rows[i].teacher.as_deref() == teacher);
            let (theory, lab): (Vec<usize>, Vec<usize>) = of_teacher.partition(|&i| rows[i].kind == CourseKind::Theory);

            let lab_section = if let Some(&first) = theory.first() {
                for &i in &theory {
                    counter += 1;
                    sections[i] = counter;
                }
                sections[first]
            } else {
                counter += 1;
                counter
            };
            for i in lab {
                sections[i] = lab_section;
            }
        }
    }

    sections
}

fn expand_courses(
    records: &[CourseRecord],
    locked: &[LockedAssignment],
    issues: &mut Vec<RecordIssue>,
) -> Vec<CourseDemand> {
    // Generated sections continue after the highest locked one per subject,
    // so a generated name never repeats a locked name.
    let mut counters: HashMap<String, u32> = HashMap::new();
    for l in locked {
        let c = counters.entry(l.demand.subject_code.clone()).or_insert(0);
        *c = (*c).max(l.demand.section);
    }

    let mut demands = Vec::new();
    for (i, r) in records.iter().enumerate() {
        let subject_code = r.subject_code.trim().to_string();
        let room_type = normalize_room_type(&r.room_type);
        let label = format!("course #{i} ({subject_code})");
        if subject_code.is_empty() {
            issues.push(RecordIssue::new(RecordIssueKind::MissingSubjectCode, label, "no subject code"));
            continue;
        }
        if room_type.is_empty() {
            issues.push(RecordIssue::new(RecordIssueKind::MissingRoomType, label, "no room type"));
            continue;
        }
        if r.section_count == 0 {
            issues.push(RecordIssue::new(RecordIssueKind::NoSections, label, "zero sections"));
            continue;
        }
        if r.theory_hours == 0 && r.lab_hours == 0 {
            issues.push(RecordIssue::new(RecordIssueKind::NoHours, label, "no theory or lab hours"));
            continue;
        }

        let teacher = normalize_teacher(r.teacher.as_ref());
        let subject_name = match r.subject_name.trim() {
            "" => subject_code.clone(),
            name => name.to_string(),
        };
        let counter = counters.entry(subject_code.clone()).or_insert(0);

        for _ in 0..r.section_count {
            *counter += 1;
            let section = *counter;
            for (kind, hours) in [(CourseKind::Theory, r.theory_hours), (CourseKind::Lab, r.lab_hours)] {
                if hours == 0 {
                    continue;
                }
                demands.push(CourseDemand {
                    name: demand_name(&subject_code, section, kind),
                    subject_code: subject_code.clone(),
                    subject_name: subject_name.clone(),
                    section,
                    teacher: teacher.clone(),
                    kind,
                    room_type: room_type.clone(),
                    curriculum: r.curriculum,
                    hours,
                });
            }
        }
    }
    demands
}

fn ingest_activities(records: &[ActivityRecord], issues: &mut Vec<RecordIssue>) -> Vec<BlockingActivity> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let name = match r.name.trim() {
                "" => "activity".to_string(),
                n => n.to_string(),
            };
            let label = format!("activity #{i} ({name})");
            let window = parse_window(r.day, r.start_hour, r.stop_hour, &label, issues)?;
            Some(BlockingActivity { name, window })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurriculumType, Weekday};

    fn locked(code: &str, teacher: &str, kind: CourseKind, day: Weekday, start: u8) -> LockedRecord {
        LockedRecord::new(code, kind, day, start, start + 2, "A101")
            .with_teacher(teacher)
            .with_room_type("lecture")
    }

    fn input_with_locked(locked: Vec<LockedRecord>) -> ScheduleInput {
        ScheduleInput {
            rooms: vec![RoomRecord::new("A101", "Lecture")],
            locked,
            ..ScheduleInput::default()
        }
    }

    fn section_of<'a>(ing: &'a Ingested, name: &str) -> Option<&'a LockedAssignment> {
        ing.locked.iter().find(|l| l.demand.name == name)
    }

    #[test]
    fn test_locked_theory_and_lab_share_section() {
        let ing = ingest(&input_with_locked(vec![
            locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8),
            locked("CS101", "Ann", CourseKind::Lab, Weekday::Monday, 13),
            locked("CS101", "Bob", CourseKind::Theory, Weekday::Tuesday, 8),
        ]));
        assert_eq!(ing.locked.len(), 3);
        assert_eq!(ing.locked[0].demand.section, 1);
        assert_eq!(ing.locked[1].demand.section, 1);
        assert_eq!(ing.locked[2].demand.section, 2);
        assert!(section_of(&ing, "CS101_sec1").is_some());
        assert!(section_of(&ing, "CS101_sec1_lab").is_some());
        assert!(section_of(&ing, "CS101_sec2").is_some());
    }

    #[test]
    fn test_repeated_theory_rows_open_separate_sections() {
        let ing = ingest(&input_with_locked(vec![
            locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8),
            locked("CS101", "Ann", CourseKind::Theory, Weekday::Tuesday, 8),
            locked("CS101", "Ann", CourseKind::Lab, Weekday::Wednesday, 8),
            locked("CS101", "Ann", CourseKind::Lab, Weekday::Thursday, 8),
        ]));
        let sections: Vec<u32> = ing.locked.iter().map(|l| l.demand.section).collect();
        assert_eq!(sections, vec![1, 2, 1, 1]);
    }

    #[test]
    fn test_lab_only_teacher_shares_one_new_section() {
        let ing = ingest(&input_with_locked(vec![
            locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8),
            locked("CS101", "Cid", CourseKind::Lab, Weekday::Tuesday, 8),
            locked("CS101", "Cid", CourseKind::Lab, Weekday::Wednesday, 8),
        ]));
        let sections: Vec<u32> = ing.locked.iter().map(|l| l.demand.section).collect();
        assert_eq!(sections, vec![1, 2, 2]);
    }

    #[test]
    fn test_sections_are_per_subject() {
        let ing = ingest(&input_with_locked(vec![
            locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8),
            locked("MA201", "Ann", CourseKind::Theory, Weekday::Tuesday, 8),
            locked("CS101", "Bob", CourseKind::Theory, Weekday::Wednesday, 8),
        ]));
        let sections: Vec<u32> = ing.locked.iter().map(|l| l.demand.section).collect();
        assert_eq!(sections, vec![1, 1, 2]);
    }

    #[test]
    fn test_locked_kind_inference() {
        let base = LockedRecord::new("CS101", CourseKind::Theory, Weekday::Monday, 8, 10, "A101");
        let ing = ingest(&input_with_locked(vec![
            base.clone().with_slot_hours(0, 2),
            base.clone().with_slot_hours(2, 2),
            base.with_slot_hours(0, 0), // ambiguous: dropped
        ]));
        assert_eq!(ing.locked.len(), 2);
        assert_eq!(ing.locked[0].demand.kind, CourseKind::Lab);
        assert_eq!(ing.locked[1].demand.kind, CourseKind::Theory);
        assert!(ing.issues.is_empty());
    }

    #[test]
    fn test_locked_room_type_falls_back_to_room() {
        let ing = ingest(&input_with_locked(vec![LockedRecord::new(
            "CS101",
            CourseKind::Theory,
            Weekday::Monday,
            8,
            10,
            "A101",
        )]));
        assert_eq!(ing.locked[0].demand.room_type, "lecture");
        assert_eq!(ing.locked[0].demand.hours, 2);
        assert_eq!(ing.locked[0].demand.subject_name, "CS101");
    }

    #[test]
    fn test_locked_missing_time_is_reported() {
        let mut bad = locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8);
        bad.day = None;
        let mut inverted = locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8);
        inverted.stop_hour = Some(7);
        let ing = ingest(&input_with_locked(vec![bad, inverted]));
        assert!(ing.locked.is_empty());
        assert_eq!(ing.issues.len(), 2);
        assert_eq!(ing.issues[0].kind, RecordIssueKind::MissingTime);
        assert_eq!(ing.issues[1].kind, RecordIssueKind::InvalidTimeRange);
    }

    #[test]
    fn test_generated_sections_continue_after_locked() {
        let mut input = input_with_locked(vec![
            locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8),
            locked("CS101", "Bob", CourseKind::Theory, Weekday::Tuesday, 8),
        ]);
        input.courses = vec![CourseRecord::new("CS101", "Lecture")
            .with_teacher("Cid")
            .with_sections(2)
            .with_theory_hours(3)
            .with_lab_hours(2)];
        let ing = ingest(&input);
        let names: Vec<&str> = ing.demands.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["CS101_sec3", "CS101_sec3_lab", "CS101_sec4", "CS101_sec4_lab"]);
        assert_eq!(ing.demands[0].hours, 3);
        assert_eq!(ing.demands[1].hours, 2);
        assert_eq!(ing.demands[0].room_type, "lecture");
        assert_eq!(ing.demands[0].teacher.as_deref(), Some("Cid"));
    }

    #[test]
    fn test_generated_names_never_repeat_locked_names() {
        // Only the theory part of section 1 is locked; its lab is not reused.
        let mut input = input_with_locked(vec![locked("CS101", "Ann", CourseKind::Theory, Weekday::Monday, 8)]);
        input.courses = vec![CourseRecord::new("CS101", "lecture")
            .with_teacher("Ann")
            .with_theory_hours(2)
            .with_lab_hours(2)];
        let ing = ingest(&input);
        let names: Vec<&str> = ing.demands.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["CS101_sec2", "CS101_sec2_lab"]);
        assert!(ing.demands.iter().all(|d| section_of(&ing, &d.name).is_none()));
    }

    #[test]
    fn test_course_counters_span_records() {
        let input = ScheduleInput {
            courses: vec![
                CourseRecord::new("CS101", "lecture").with_theory_hours(2),
                CourseRecord::new("CS101", "lecture").with_theory_hours(2).with_curriculum(CurriculumType::Special),
                CourseRecord::new("MA201", "lecture").with_lab_hours(1),
            ],
            ..ScheduleInput::default()
        };
        let ing = ingest(&input);
        let names: Vec<&str> = ing.demands.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["CS101_sec1", "CS101_sec2", "MA201_sec1_lab"]);
        assert_eq!(ing.demands[1].curriculum, CurriculumType::Special);
    }

    #[test]
    fn test_malformed_courses_are_skipped_and_reported() {
        let input = ScheduleInput {
            courses: vec![
                CourseRecord::new("", "lecture").with_theory_hours(2),
                CourseRecord::new("CS101", " ").with_theory_hours(2),
                CourseRecord::new("CS102", "lecture").with_sections(0).with_theory_hours(2),
                CourseRecord::new("CS103", "lecture"),
                CourseRecord::new("CS104", "lecture").with_teacher("  ").with_theory_hours(1),
            ],
            ..ScheduleInput::default()
        };
        let ing = ingest(&input);
        let kinds: Vec<RecordIssueKind> = ing.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordIssueKind::MissingSubjectCode,
                RecordIssueKind::MissingRoomType,
                RecordIssueKind::NoSections,
                RecordIssueKind::NoHours,
            ]
        );
        assert_eq!(ing.demands.len(), 1);
        assert!(ing.demands[0].teacher.is_none());
    }

    #[test]
    fn test_rooms_and_windows_validation() {
        let input = ScheduleInput {
            rooms: vec![
                RoomRecord::new("A101", "Lecture"),
                RoomRecord::new("A101", "lab"),
                RoomRecord::new("", "lab"),
                RoomRecord::new("L1", ""),
            ],
            time_windows: vec![
                TimeWindowRecord::new(Weekday::Monday, 8, 12),
                TimeWindowRecord::new(Weekday::Monday, 12, 12),
            ],
            ..ScheduleInput::default()
        };
        let ing = ingest(&input);
        assert_eq!(ing.rooms.len(), 1);
        assert_eq!(ing.rooms[0].room_type, "lecture");
        assert_eq!(ing.windows.len(), 1);
        let kinds: Vec<RecordIssueKind> = ing.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordIssueKind::DuplicateRoom,
                RecordIssueKind::MissingRoom,
                RecordIssueKind::MissingRoomType,
                RecordIssueKind::InvalidTimeRange,
            ]
        );
    }

    #[test]
    fn test_activities() {
        let input = ScheduleInput {
            activities: vec![
                ActivityRecord::new("Midterm", Weekday::Friday, 8, 12),
                ActivityRecord::new("", Weekday::Friday, 13, 14),
                ActivityRecord {
                    name: "Broken".into(),
                    day: None,
                    start_hour: Some(8),
                    stop_hour: Some(9),
                },
            ],
            ..ScheduleInput::default()
        };
        let ing = ingest(&input);
        assert_eq!(ing.activities.len(), 2);
        assert_eq!(ing.activities[0].slots().len(), 4);
        assert_eq!(ing.activities[1].name, "activity");
        assert_eq!(ing.issues.len(), 1);
    }
}
