//! Curriculum time rules.
//!
//! A curriculum type decides which hours of which days a course may use.
//! Regular programs teach on weekday daytime hours; special programs use
//! weekday evenings plus the whole weekend. The ranges are configuration,
//! not law: [`CurriculumRules`] is deserializable and has builder setters.

use serde::{Deserialize, Serialize};

use super::Weekday;

/// Curriculum classification of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurriculumType {
    /// Weekday daytime program.
    #[default]
    Regular,
    /// Evening and weekend program.
    Special,
}

impl CurriculumType {
    /// Both curriculum types.
    pub const ALL: [CurriculumType; 2] = [CurriculumType::Regular, CurriculumType::Special];

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            CurriculumType::Regular => "regular",
            CurriculumType::Special => "special",
        }
    }
}

impl std::fmt::Display for CurriculumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive hour range `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    /// First allowed hour.
    pub first: u8,
    /// Last allowed hour (inclusive).
    pub last: u8,
}

impl HourRange {
    /// Creates a range.
    pub fn new(first: u8, last: u8) -> Self {
        Self { first, last }
    }

    #[inline]
    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.first && hour <= self.last
    }

    /// Whether the range covers at least one hour of a day.
    pub fn is_well_formed(&self) -> bool {
        self.first <= self.last && self.last < 24
    }
}

/// Allowed hours on weekdays and on weekends. `None` = day class closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayRule {
    /// Monday to Friday.
    pub weekday: Option<HourRange>,
    /// Saturday and Sunday.
    pub weekend: Option<HourRange>,
}

impl DayRule {
    /// Range for a given day, if open.
    pub fn range_for(&self, day: Weekday) -> Option<HourRange> {
        if day.is_weekend() {
            self.weekend
        } else {
            self.weekday
        }
    }
}

/// Per-curriculum hour rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurriculumRules {
    /// Rule for [`CurriculumType::Regular`].
    pub regular: DayRule,
    /// Rule for [`CurriculumType::Special`].
    pub special: DayRule,
}

impl Default for CurriculumRules {
    fn default() -> Self {
        Self {
            regular: DayRule {
                weekday: Some(HourRange::new(8, 19)),
                weekend: None,
            },
            special: DayRule {
                weekday: Some(HourRange::new(17, 22)),
                weekend: Some(HourRange::new(7, 22)),
            },
        }
    }
}

impl CurriculumRules {
    /// Replaces the regular rule.
    pub fn with_regular(mut self, rule: DayRule) -> Self {
        self.regular = rule;
        self
    }

    /// Replaces the special rule.
    pub fn with_special(mut self, rule: DayRule) -> Self {
        self.special = rule;
        self
    }

    /// Rule for a curriculum.
    pub fn rule(&self, curriculum: CurriculumType) -> &DayRule {
        match curriculum {
            CurriculumType::Regular => &self.regular,
            CurriculumType::Special => &self.special,
        }
    }

    /// Whether `curriculum` may use `hour` on `day`.
    #[inline]
    pub fn allows(&self, day: Weekday, hour: u8, curriculum: CurriculumType) -> bool {
        self.rule(curriculum)
            .range_for(day)
            .is_some_and(|r| r.contains(hour))
    }

    /// Malformed ranges, described for config validation.
    pub fn malformed_ranges(&self) -> Vec<String> {
        let mut bad = Vec::new();
        for ct in CurriculumType::ALL {
            let rule = self.rule(ct);
            for (label, range) in [("weekday", rule.weekday), ("weekend", rule.weekend)] {
                if let Some(r) = range {
                    if !r.is_well_formed() {
                        bad.push(format!("{ct} {label} range {}..={}", r.first, r.last));
                    }
                }
            }
        }
        bad
    }
}
