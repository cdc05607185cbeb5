//! Candidate fitness.
//!
//! # Scoring
//!
//! Every course assignment (locked or generated) is walked slot by slot:
//! - unplaced: `unplaced_penalty` per required hour, nothing else checked
//! - slot inside a blackout: `blocked_penalty`
//! - hour not legal for the curriculum: `out_of_window_penalty`, remaining
//!   checks for that slot skipped
//! - teacher already seen at that slot: `teacher_conflict_penalty`,
//!   otherwise `teacher_reward`
//! - room already seen at that slot: `room_conflict_penalty`, otherwise
//!   `room_reward`
//!
//! Each same-day pair of adjacent hours inside one assignment earns
//! `contiguity_bonus`. The "seen" sets live for one evaluation only, so
//! clashes introduced by crossover or mutation are always caught.
//!
//! Blackout activities are not scored; they carry no teacher, room or
//! curriculum.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ScheduleContext;
use crate::models::{Candidate, Placement, TimeSlot};

/// Score weights. Penalties are positive magnitudes and are subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    pub unplaced_penalty: i64,
    pub blocked_penalty: i64,
    pub out_of_window_penalty: i64,
    pub teacher_conflict_penalty: i64,
    pub room_conflict_penalty: i64,
    pub teacher_reward: i64,
    pub room_reward: i64,
    pub contiguity_bonus: i64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            unplaced_penalty: 1000,
            blocked_penalty: 1000,
            out_of_window_penalty: 50,
            teacher_conflict_penalty: 1000,
            room_conflict_penalty: 1000,
            teacher_reward: 30,
            room_reward: 30,
            contiguity_bonus: 5,
        }
    }
}

impl FitnessWeights {
    /// Sets the per-hour penalty for unplaced demands.
    pub fn with_unplaced_penalty(mut self, penalty: i64) -> Self {
        self.unplaced_penalty = penalty;
        self
    }

    /// Sets both double-booking penalties.
    pub fn with_conflict_penalty(mut self, penalty: i64) -> Self {
        self.teacher_conflict_penalty = penalty;
        self.room_conflict_penalty = penalty;
        self
    }

    /// Sets the adjacency bonus.
    pub fn with_contiguity_bonus(mut self, bonus: i64) -> Self {
        self.contiguity_bonus = bonus;
        self
    }
}

/// Scores a candidate. Higher is better.
pub fn evaluate(candidate: &Candidate, ctx: &ScheduleContext) -> i64 {
    let w = ctx.weights();
    let mut teacher_seen: HashSet<(&str, TimeSlot)> = HashSet::new();
    let mut room_seen: HashSet<(&str, TimeSlot)> = HashSet::new();
    let mut score = 0i64;

    for a in candidate.assignments() {
        let Some(demand) = a.session.demand() else {
            continue;
        };
        let (room, slots) = match &a.placement {
            Placement::Unplaced { hours } => {
                score -= w.unplaced_penalty * i64::from(*hours);
                continue;
            }
            Placement::Placed { room, slots } => (room.as_deref(), slots),
        };

        for slot in slots {
            if ctx.blocked().contains(slot) {
                score -= w.blocked_penalty;
            }
            if !ctx.calendar().is_valid(slot, demand.curriculum) {
                score -= w.out_of_window_penalty;
                continue;
            }
            if let Some(teacher) = demand.teacher.as_deref() {
                if teacher_seen.insert((teacher, *slot)) {
                    score += w.teacher_reward;
                } else {
                    score -= w.teacher_conflict_penalty;
                }
            }
            if let Some(room) = room {
                if room_seen.insert((room, *slot)) {
                    score += w.room_reward;
                } else {
                    score -= w.room_conflict_penalty;
                }
            }
        }

        let adjacent = slots.windows(2).filter(|p| p[0].is_followed_by(&p[1])).count();
        score += w.contiguity_bonus * adjacent as i64;
    }

    score
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{
        Assignment, BlockingActivity, CourseDemand, CourseKind, CurriculumRules, CurriculumType, Origin, Room,
        Session, TimeWindow, Weekday, WeeklyCalendar,
    };

    fn ctx(activities: &[BlockingActivity]) -> ScheduleContext {
        let calendar =
            WeeklyCalendar::from_windows(&[TimeWindow::new(Weekday::Monday, 8, 22)], CurriculumRules::default());
        ScheduleContext::new(
            calendar,
            &[Room::new("A1", "lecture"), Room::new("A2", "lecture")],
            &[],
            activities,
            Vec::new(),
            FitnessWeights::default(),
        )
    }

    fn placed(teacher: Option<&str>, room: &str, hours: &[u8]) -> Assignment {
        let mut d = CourseDemand::new("CS101", 1, CourseKind::Theory, "lecture", CurriculumType::Regular, 1);
        d.teacher = teacher.map(str::to_string);
        Assignment::new(
            Arc::new(Session::Course(d)),
            Origin::Generated,
            Placement::Placed {
                room: Some(room.into()),
                slots: hours.iter().map(|&h| TimeSlot::new(Weekday::Monday, h)).collect(),
            },
        )
    }

    fn candidate(ctx: &ScheduleContext, generated: Vec<Assignment>) -> Candidate {
        Candidate::new(ctx.fixed().clone(), generated)
    }

    #[test]
    fn test_clean_block_scores_rewards_and_bonus() {
        let ctx = ctx(&[]);
        let c = candidate(&ctx, vec![placed(Some("Ann"), "A1", &[8, 9, 10])]);
        // 3 × (30 + 30) + 2 × 5
        assert_eq!(evaluate(&c, &ctx), 190);
    }

    #[test]
    fn test_unstaffed_scores_room_only() {
        let ctx = ctx(&[]);
        let c = candidate(&ctx, vec![placed(None, "A1", &[8])]);
        assert_eq!(evaluate(&c, &ctx), 30);
    }

    #[test]
    fn test_unplaced_penalty_per_hour() {
        let ctx = ctx(&[]);
        let mut a = placed(Some("Ann"), "A1", &[]);
        a.placement = Placement::Unplaced { hours: 3 };
        assert_eq!(evaluate(&candidate(&ctx, vec![a]), &ctx), -3000);
    }

    #[test]
    fn test_teacher_and_room_conflicts() {
        let ctx = ctx(&[]);
        let c = candidate(
            &ctx,
            vec![placed(Some("Ann"), "A1", &[8]), placed(Some("Ann"), "A1", &[8])],
        );
        // first: +60, second: -1000 teacher, -1000 room
        assert_eq!(evaluate(&c, &ctx), 60 - 2000);

        let split = candidate(
            &ctx,
            vec![placed(Some("Ann"), "A1", &[8]), placed(Some("Ann"), "A2", &[8])],
        );
        assert_eq!(evaluate(&split, &ctx), 60 + 30 - 1000);
    }

    #[test]
    fn test_out_of_window_skips_other_checks() {
        let ctx = ctx(&[]);
        // regular ends at 19; 20 is illegal
        let c = candidate(&ctx, vec![placed(Some("Ann"), "A1", &[19, 20])]);
        assert_eq!(evaluate(&c, &ctx), 60 - 50 + 5);
    }

    #[test]
    fn test_blackout_hit_is_penalized_and_activity_unscored() {
        let ctx = ctx(&[BlockingActivity::new("Assembly", Weekday::Monday, 8, 9)]);
        let empty = candidate(&ctx, Vec::new());
        assert_eq!(evaluate(&empty, &ctx), 0);
        let c = candidate(&ctx, vec![placed(Some("Ann"), "A1", &[8])]);
        assert_eq!(evaluate(&c, &ctx), 60 - 1000);
    }

    #[test]
    fn test_weights_deserialize_with_defaults() {
        let w: FitnessWeights = serde_json::from_str(r#"{"contiguity_bonus": 9}"#).unwrap();
        assert_eq!(w.contiguity_bonus, 9);
        assert_eq!(w.unplaced_penalty, 1000);
        assert_eq!(FitnessWeights::default().with_conflict_penalty(5).room_conflict_penalty, 5);
    }
}
