//! Capacity precheck.
//!
//! Fail-fast gate run before any candidate is built. For every
//! (room type, curriculum) pair that appears in the unlocked demand:
//!
//! - **Total hours**: free (room, slot) pairs across rooms of that type,
//!   after blackout and locked sessions, restricted to hours the curriculum
//!   may use, must cover the summed demand hours.
//! - **Contiguous block**: the longest run of consecutive free valid hours in
//!   any single room of that type must fit the largest single demand. A demand
//!   longer than every run can never be placed, whatever the total. Only
//!   reported for pairs that pass the total-hours test.
//!
//! The check is a pure function of its inputs: same inputs, same report.

use std::collections::BTreeMap;
use std::fmt;

use crate::ingest::RecordIssue;
use crate::models::{CourseDemand, CurriculumType, LockedAssignment, Room, SlotPool, TimeSlot, WeeklyCalendar};

/// Which test a pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShortfallKind {
    /// Summed demand hours exceed free slot-hours.
    TotalHours,
    /// Largest single demand exceeds the longest consecutive free run.
    ContiguousBlock,
}

/// One failing (room type, curriculum) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityShortfall {
    pub room_type: String,
    pub curriculum: CurriculumType,
    pub kind: ShortfallKind,
    /// Hours needed.
    pub required: u32,
    /// Hours available.
    pub available: u32,
}

impl CapacityShortfall {
    /// Missing hours.
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.available)
    }
}

impl fmt::Display for CapacityShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ShortfallKind::TotalHours => "total hours",
            ShortfallKind::ContiguousBlock => "contiguous hours",
        };
        write!(
            f,
            "{}/{}: {} required {}, available {} (short {})",
            self.room_type,
            self.curriculum,
            what,
            self.required,
            self.available,
            self.missing()
        )
    }
}

/// Result of the precheck; no shortfalls when feasible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityReport {
    /// Offending pairs ordered by (room type, curriculum, kind).
    pub shortfalls: Vec<CapacityShortfall>,
    /// Input records skipped during ingestion. A skipped room often explains
    /// a shortfall. Filled in by the engine; empty from [`check_capacity`].
    pub skipped: Vec<RecordIssue>,
}

impl CapacityReport {
    /// Whether every pair passed.
    pub fn is_feasible(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

impl fmt::Display for CapacityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shortfalls.is_empty() {
            return write!(f, "no shortfalls");
        }
        for (i, s) in self.shortfalls.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{s}")?;
        }
        if !self.skipped.is_empty() {
            write!(f, " ({} input records skipped)", self.skipped.len())?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct PairDemand {
    total: u32,
    largest: u32,
}

/// Checks slot capacity for every (room type, curriculum) pair in `demands`.
///
/// `pool` must already have the blackout applied. Locked sessions are
/// subtracted here.
pub fn check_capacity(
    calendar: &WeeklyCalendar,
    pool: &SlotPool,
    rooms: &[Room],
    locked: &[LockedAssignment],
    demands: &[CourseDemand],
) -> CapacityReport {
    let mut by_pair: BTreeMap<(&str, CurriculumType), PairDemand> = BTreeMap::new();
    for d in demands {
        let entry = by_pair.entry((d.room_type.as_str(), d.curriculum)).or_default();
        entry.total += u32::from(d.hours);
        entry.largest = entry.largest.max(u32::from(d.hours));
    }

    let locked_slots: Vec<(&str, TimeSlot)> = locked
        .iter()
        .flat_map(|l| l.slots().into_iter().map(move |s| (l.room.as_str(), s)))
        .collect();
    let free = pool.without_occupied(locked_slots.iter().map(|(r, s)| (*r, s)));

    let mut shortfalls = Vec::new();
    for ((room_type, curriculum), need) in by_pair {
        let mut capacity = 0u32;
        let mut longest = 0u32;
        for room in rooms.iter().filter(|r| r.serves(room_type)) {
            let (count, run) = valid_hours_in(calendar, free.slots(&room.name), curriculum);
            capacity += count;
            longest = longest.max(run);
        }

        if need.total > capacity {
            shortfalls.push(CapacityShortfall {
                room_type: room_type.to_string(),
                curriculum,
                kind: ShortfallKind::TotalHours,
                required: need.total,
                available: capacity,
            });
        } else if need.largest > longest {
            shortfalls.push(CapacityShortfall {
                room_type: room_type.to_string(),
                curriculum,
                kind: ShortfallKind::ContiguousBlock,
                required: need.largest,
                available: longest,
            });
        }
    }

    CapacityReport {
        shortfalls,
        skipped: Vec::new(),
    }
}

/// (valid slot count, longest same-day consecutive valid run) of a sorted slot list.
fn valid_hours_in(calendar: &WeeklyCalendar, slots: &[TimeSlot], curriculum: CurriculumType) -> (u32, u32) {
    let mut count = 0u32;
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<TimeSlot> = None;
    for slot in slots.iter().filter(|s| calendar.is_valid(s, curriculum)) {
        count += 1;
        run = match prev {
            Some(p) if p.is_followed_by(slot) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*slot);
    }
    (count, longest)
}
