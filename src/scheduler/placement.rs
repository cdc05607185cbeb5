//! Consecutive-times placement search.
//!
//! For each room of the required type, the room's pool list (sorted by day,
//! then hour) is scanned for the first run of `hours` entries that are:
//! 1. on the same day with strictly consecutive hours,
//! 2. legal for the demand's curriculum,
//! 3. outside every blackout,
//! 4. free for the demand's teacher,
//! 5. free for the room itself.
//!
//! Only the first window per room is considered. Among rooms that found one,
//! the room holding the fewest slots in the candidate wins; ties are broken
//! uniformly at random. The winning window is consumed from the pool.

use std::collections::HashMap;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::ScheduleContext;
use crate::models::{Assignment, CourseDemand, Placement, SlotPool, TimeSlot};

/// Teacher and room occupancy of one candidate.
///
/// Counts holders per slot, so releasing one of two clashing assignments
/// leaves the slot occupied.
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    rooms: HashMap<String, HashMap<TimeSlot, u32>>,
    teachers: HashMap<String, HashMap<TimeSlot, u32>>,
}

impl UsageTracker {
    /// Occupancy of every given assignment.
    pub fn from_assignments<'a>(assignments: impl IntoIterator<Item = &'a Assignment>) -> Self {
        let mut usage = Self::default();
        for a in assignments {
            usage.occupy(a);
        }
        usage
    }

    /// Marks an assignment's room and teacher slots as used.
    pub fn occupy(&mut self, assignment: &Assignment) {
        let slots = assignment.placement.slots();
        if let Some(room) = assignment.placement.room() {
            add(&mut self.rooms, room, slots);
        }
        if let Some(teacher) = assignment.session.teacher() {
            add(&mut self.teachers, teacher, slots);
        }
    }

    /// Undoes [`occupy`](Self::occupy).
    pub fn release(&mut self, assignment: &Assignment) {
        let slots = assignment.placement.slots();
        if let Some(room) = assignment.placement.room() {
            remove(&mut self.rooms, room, slots);
        }
        if let Some(teacher) = assignment.session.teacher() {
            remove(&mut self.teachers, teacher, slots);
        }
    }

    #[inline]
    pub fn room_busy(&self, room: &str, slot: &TimeSlot) -> bool {
        self.rooms.get(room).is_some_and(|s| s.contains_key(slot))
    }

    #[inline]
    pub fn teacher_busy(&self, teacher: &str, slot: &TimeSlot) -> bool {
        self.teachers.get(teacher).is_some_and(|s| s.contains_key(slot))
    }

    /// Distinct slots the room holds.
    pub fn room_load(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, HashMap::len)
    }
}

fn add(map: &mut HashMap<String, HashMap<TimeSlot, u32>>, key: &str, slots: &[TimeSlot]) {
    if slots.is_empty() {
        return;
    }
    let entry = map.entry(key.to_string()).or_default();
    for s in slots {
        *entry.entry(*s).or_insert(0) += 1;
    }
}

fn remove(map: &mut HashMap<String, HashMap<TimeSlot, u32>>, key: &str, slots: &[TimeSlot]) {
    let Some(entry) = map.get_mut(key) else {
        return;
    };
    for s in slots {
        if let Some(count) = entry.get_mut(s) {
            *count -= 1;
            if *count == 0 {
                entry.remove(s);
            }
        }
    }
}

/// Places one demand, consuming the chosen window from `pool`.
///
/// Returns [`Placement::Unplaced`] when no compatible room has a feasible
/// window. `usage` is only read; the caller records the result.
pub fn place<R: Rng>(
    demand: &CourseDemand,
    ctx: &ScheduleContext,
    usage: &UsageTracker,
    pool: &mut SlotPool,
    rng: &mut R,
) -> Placement {
    let hours = usize::from(demand.hours);
    if hours == 0 {
        return Placement::Unplaced { hours: demand.hours };
    }

    let found: Vec<(&str, &[TimeSlot])> = ctx
        .rooms_of_type(&demand.room_type)
        .iter()
        .filter_map(|room| first_window(demand, room, hours, ctx, usage, pool.slots(room)).map(|w| (room.as_str(), w)))
        .collect();

    let Some(min_load) = found.iter().map(|(room, _)| usage.room_load(room)).min() else {
        return Placement::Unplaced { hours: demand.hours };
    };
    let lightest: Vec<&(&str, &[TimeSlot])> = found.iter().filter(|(room, _)| usage.room_load(room) == min_load).collect();
    let Some(&&(room, window)) = lightest.choose(rng) else {
        return Placement::Unplaced { hours: demand.hours };
    };

    let room = room.to_string();
    let slots = window.to_vec();
    pool.reserve(&room, &slots);
    Placement::Placed {
        room: Some(room),
        slots,
    }
}

/// First feasible window of `hours` entries in a room's sorted slot list.
fn first_window<'p>(
    demand: &CourseDemand,
    room: &str,
    hours: usize,
    ctx: &ScheduleContext,
    usage: &UsageTracker,
    slots: &'p [TimeSlot],
) -> Option<&'p [TimeSlot]> {
    let usable = |s: &TimeSlot| {
        ctx.calendar().is_valid(s, demand.curriculum)
            && !ctx.blocked().contains(s)
            && !usage.room_busy(room, s)
            && demand.teacher.as_deref().map_or(true, |t| !usage.teacher_busy(t, s))
    };
    slots.windows(hours).find(|w| {
        w.windows(2).all(|pair| pair[0].is_followed_by(&pair[1])) && w.iter().all(usable)
    })
}
