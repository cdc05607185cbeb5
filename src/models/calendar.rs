//! Weekly calendar models.
//!
//! Defines the recurring weekly grid: days, atomic hour slots, and the
//! time windows during which teaching may happen at all.
//!
//! # Time Model
//! A week is seven days; each day is divided into whole hours `0..24`.
//! A [`TimeSlot`] is one (day, hour) cell. Windows are half-open:
//! `[start_hour, stop_hour)`.
//!
//! # Precedence
//! An hour is usable by a curriculum iff:
//! - It falls within at least one weekly window for that day, AND
//! - It falls within the curriculum's hour range for that day
//!   (see [`CurriculumRules`]).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CurriculumRules, CurriculumType};

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Whether this is Saturday or Sunday.
    #[inline]
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// Lower-case English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts full names and three-letter abbreviations, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.name() == lower || (lower.len() == 3 && d.name().starts_with(&lower)))
            .ok_or_else(|| format!("unknown weekday '{s}'"))
    }
}

/// An atomic (day, hour) cell of the weekly grid.
///
/// Ordering is by day, then hour, which is the scan order of slot pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of week.
    pub day: Weekday,
    /// Hour of day (0..24).
    pub hour: u8,
}

impl TimeSlot {
    /// Creates a new slot.
    pub fn new(day: Weekday, hour: u8) -> Self {
        Self { day, hour }
    }

    /// Whether `next` is the hour immediately after this one on the same day.
    #[inline]
    pub fn is_followed_by(&self, next: &TimeSlot) -> bool {
        self.day == next.day && next.hour == self.hour + 1
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.day, self.hour)
    }
}

/// A weekly interval on one day, `[start_hour, stop_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Day of week.
    pub day: Weekday,
    /// First hour (inclusive).
    pub start_hour: u8,
    /// Last hour (exclusive).
    pub stop_hour: u8,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(day: Weekday, start_hour: u8, stop_hour: u8) -> Self {
        Self {
            day,
            start_hour,
            stop_hour,
        }
    }

    /// Number of hours covered.
    #[inline]
    pub fn len_hours(&self) -> u8 {
        self.stop_hour.saturating_sub(self.start_hour)
    }

    /// Whether the window is non-empty and inside a 24-hour day.
    pub fn is_well_formed(&self) -> bool {
        self.start_hour < self.stop_hour && self.stop_hour <= 24
    }

    /// Whether a slot falls within this window.
    #[inline]
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        slot.day == self.day && slot.hour >= self.start_hour && slot.hour < self.stop_hour
    }

    /// Expands the window into its hourly slots, in order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        (self.start_hour..self.stop_hour)
            .map(|h| TimeSlot::new(self.day, h))
            .collect()
    }
}

/// The weekly teaching calendar for one run.
///
/// Holds the hours opened by the weekly windows per day together with the
/// curriculum rules, and answers `valid_hours(day, curriculum)`.
/// Constructed fresh per invocation; never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct WeeklyCalendar {
    hours_by_day: BTreeMap<Weekday, BTreeSet<u8>>,
    rules: CurriculumRules,
}

impl WeeklyCalendar {
    /// Builds a calendar from weekly windows. Malformed windows are ignored.
    pub fn from_windows(windows: &[TimeWindow], rules: CurriculumRules) -> Self {
        let mut hours_by_day: BTreeMap<Weekday, BTreeSet<u8>> = BTreeMap::new();
        for w in windows.iter().filter(|w| w.is_well_formed()) {
            hours_by_day
                .entry(w.day)
                .or_default()
                .extend(w.start_hour..w.stop_hour);
        }
        Self {
            hours_by_day,
            rules,
        }
    }

    /// Curriculum rules in effect.
    pub fn rules(&self) -> &CurriculumRules {
        &self.rules
    }

    /// Whether no window opened any hour.
    pub fn is_empty(&self) -> bool {
        self.hours_by_day.values().all(|h| h.is_empty())
    }

    /// Every open slot, sorted by (day, hour), without duplicates.
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.hours_by_day
            .iter()
            .flat_map(|(&day, hours)| hours.iter().map(move |&h| TimeSlot::new(day, h)))
            .collect()
    }

    /// Hours of `day` legally usable by `curriculum`, ascending.
    pub fn valid_hours(&self, day: Weekday, curriculum: CurriculumType) -> Vec<u8> {
        match self.hours_by_day.get(&day) {
            Some(hours) => hours
                .iter()
                .copied()
                .filter(|&h| self.rules.allows(day, h, curriculum))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether `slot` is open in the calendar and allowed for `curriculum`.
    #[inline]
    pub fn is_valid(&self, slot: &TimeSlot, curriculum: CurriculumType) -> bool {
        self.hours_by_day
            .get(&slot.day)
            .is_some_and(|hours| hours.contains(&slot.hour))
            && self.rules.allows(slot.day, slot.hour, curriculum)
    }
}
