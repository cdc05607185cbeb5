//! Per-room pools of unconsumed weekly slots.
//!
//! Every room starts with the same list of open calendar slots, sorted by
//! (day, hour). Blackout activities are removed from every room once, before
//! any candidate exists. Each candidate then works on its own clone and only
//! ever removes slots from it.
//!
//! # Invariant
//! A slot present in a room's list is free for that room within the owning
//! candidate.

use std::collections::{BTreeMap, HashSet};

use super::{Room, TimeSlot, WeeklyCalendar};

/// Mapping room name → ordered unconsumed slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPool {
    rooms: BTreeMap<String, Vec<TimeSlot>>,
}

impl SlotPool {
    /// Gives every named room the full list of calendar slots.
    pub fn build(calendar: &WeeklyCalendar, rooms: &[Room]) -> Self {
        let all = calendar.slots();
        let rooms = rooms
            .iter()
            .filter(|r| !r.name.is_empty())
            .map(|r| (r.name.clone(), all.clone()))
            .collect();
        Self { rooms }
    }

    /// Removes blacked-out slots from every room.
    pub fn apply_blackout(&mut self, blocked: &HashSet<TimeSlot>) {
        if blocked.is_empty() {
            return;
        }
        for slots in self.rooms.values_mut() {
            slots.retain(|s| !blocked.contains(s));
        }
    }

    /// Free slots of a room (empty if the room is unknown).
    pub fn slots(&self, room: &str) -> &[TimeSlot] {
        self.rooms.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the room is known to the pool.
    pub fn contains_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    /// Iterates rooms and their free slots.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TimeSlot])> {
        self.rooms.iter().map(|(r, s)| (r.as_str(), s.as_slice()))
    }

    /// Consumes slots of a room. Slots not present are ignored.
    pub fn reserve(&mut self, room: &str, taken: &[TimeSlot]) {
        if let Some(slots) = self.rooms.get_mut(room) {
            slots.retain(|s| !taken.contains(s));
        }
    }

    /// Copy of this pool minus every (room, slot) pair in `occupied`.
    pub fn without_occupied<'a, I>(&self, occupied: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a TimeSlot)>,
    {
        let mut taken: HashSet<(&str, TimeSlot)> = HashSet::new();
        for (room, slot) in occupied {
            taken.insert((room, *slot));
        }
        let rooms = self
            .rooms
            .iter()
            .map(|(room, slots)| {
                let free = slots
                    .iter()
                    .filter(|s| !taken.contains(&(room.as_str(), **s)))
                    .copied()
                    .collect();
                (room.clone(), free)
            })
            .collect();
        Self { rooms }
    }

    /// Total number of free (room, slot) pairs.
    pub fn total_free(&self) -> usize {
        self.rooms.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurriculumRules, TimeWindow, Weekday};

    fn calendar() -> WeeklyCalendar {
        WeeklyCalendar::from_windows(
            &[
                TimeWindow::new(Weekday::Tuesday, 8, 10),
                TimeWindow::new(Weekday::Monday, 8, 12),
            ],
            CurriculumRules::default(),
        )
    }

    fn rooms() -> Vec<Room> {
        vec![Room::new("A101", "lecture"), Room::new("L1", "lab")]
    }

    #[test]
    fn test_build_gives_every_room_same_sorted_slots() {
        let pool = SlotPool::build(&calendar(), &rooms());
        assert_eq!(pool.slots("A101"), pool.slots("L1"));
        let slots = pool.slots("A101");
        assert_eq!(slots.len(), 6);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(pool.total_free(), 12);
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = SlotPool::build(&calendar(), &rooms());
        let b = SlotPool::build(&calendar(), &rooms());
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_blackout_hits_every_room() {
        let mut pool = SlotPool::build(&calendar(), &rooms());
        let blocked: HashSet<TimeSlot> = [TimeSlot::new(Weekday::Monday, 8), TimeSlot::new(Weekday::Monday, 9)]
            .into_iter()
            .collect();
        pool.apply_blackout(&blocked);
        for (_, slots) in pool.iter() {
            assert_eq!(slots.len(), 4);
            assert!(slots.iter().all(|s| !blocked.contains(s)));
        }
    }

    #[test]
    fn test_reserve_only_affects_one_room() {
        let mut pool = SlotPool::build(&calendar(), &rooms());
        pool.reserve("A101", &[TimeSlot::new(Weekday::Monday, 10)]);
        assert_eq!(pool.slots("A101").len(), 5);
        assert_eq!(pool.slots("L1").len(), 6);
        assert!(pool.slots("missing").is_empty());
    }

    #[test]
    fn test_without_occupied() {
        let pool = SlotPool::build(&calendar(), &rooms());
        let s = TimeSlot::new(Weekday::Tuesday, 9);
        let rebuilt = pool.without_occupied([("L1", &s)]);
        assert_eq!(rebuilt.slots("L1").len(), 5);
        assert_eq!(rebuilt.slots("A101").len(), 6);
        // source pool untouched
        assert_eq!(pool.slots("L1").len(), 6);
    }
}
