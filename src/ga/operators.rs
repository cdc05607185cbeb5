//! Crossover and mutation on timetable candidates.
//!
//! - **Crossover** keeps the first parent's fixed part and splices the
//!   unlocked assignments at one random cut point. No repair is attempted;
//!   clashes are left for mutation and selection to remove.
//! - **Mutation** re-places each unlocked assignment with probability
//!   `rate`, searching a pool rebuilt from the whole candidate's current
//!   occupancy.

use rand::Rng;

use crate::models::Candidate;
use crate::scheduler::{place, ScheduleContext, UsageTracker};

/// One-point crossover: `p1`'s prefix followed by `p2`'s suffix.
///
/// Parents of one run have equally long, position-aligned unlocked lists;
/// with fewer than two unlocked assignments the child is a copy of `p1`.
pub fn crossover<R: Rng>(p1: &Candidate, p2: &Candidate, rng: &mut R) -> Candidate {
    let len = p1.generated.len().min(p2.generated.len());
    if len < 2 {
        return p1.clone();
    }
    let cut = rng.random_range(1..len);
    let generated = p1.generated[..cut]
        .iter()
        .chain(&p2.generated[cut..])
        .cloned()
        .collect();
    Candidate::new(p1.fixed.clone(), generated)
}

/// Re-places each unlocked assignment with probability `rate`.
///
/// The pool for a re-placement is the base pool minus every (room, slot)
/// the candidate holds at that moment, including the mutated assignment's
/// own slots, so a moved session always lands somewhere new or unplaced.
pub fn mutate<R: Rng>(candidate: &mut Candidate, ctx: &ScheduleContext, rate: f64, rng: &mut R) {
    let mut usage: Option<UsageTracker> = None;

    for i in 0..candidate.generated.len() {
        if !rng.random_bool(rate) {
            continue;
        }
        let Some(demand) = candidate.generated[i].session.demand().cloned() else {
            continue;
        };
        let usage = usage.get_or_insert_with(|| UsageTracker::from_assignments(candidate.assignments()));

        let mut pool = ctx
            .pool()
            .without_occupied(candidate.assignments().flat_map(|a| a.room_slots()));
        usage.release(&candidate.generated[i]);
        let placement = place(&demand, ctx, usage, &mut pool, rng);

        let assignment = &mut candidate.generated[i];
        assignment.placement = placement;
        usage.occupy(assignment);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::models::{
        CourseDemand, CourseKind, CurriculumRules, CurriculumType, Placement, Room, TimeSlot, TimeWindow, Weekday,
        WeeklyCalendar,
    };
    use crate::scheduler::{construct, FitnessWeights};

    fn context(hours: (u8, u8), demands: usize) -> ScheduleContext {
        let calendar = WeeklyCalendar::from_windows(
            &[TimeWindow::new(Weekday::Monday, hours.0, hours.1)],
            CurriculumRules::default(),
        );
        let demands = (0..demands)
            .map(|i| {
                CourseDemand::new(format!("CS{i:03}"), 1, CourseKind::Theory, "lecture", CurriculumType::Regular, 1)
                    .with_teacher(format!("T{i}"))
            })
            .collect();
        ScheduleContext::new(
            calendar,
            &[Room::new("A1", "lecture"), Room::new("A2", "lecture")],
            &[],
            &[],
            demands,
            FitnessWeights::default(),
        )
    }

    #[test]
    fn test_crossover_splices_at_cut() {
        let ctx = context((8, 18), 6);
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = construct(&ctx, &mut rng);
        let p2 = construct(&ctx, &mut rng);
        let child = crossover(&p1, &p2, &mut rng);

        assert_eq!(child.generated.len(), 6);
        let names: Vec<&str> = child.generated.iter().map(|a| a.session.name()).collect();
        let expected: Vec<&str> = p1.generated.iter().map(|a| a.session.name()).collect();
        assert_eq!(names, expected);

        let cut = (1..6)
            .find(|&c| child.generated[..c] == p1.generated[..c] && child.generated[c..] == p2.generated[c..]);
        assert!(cut.is_some());
        assert!(std::sync::Arc::ptr_eq(&child.fixed, &p1.fixed));
    }

    #[test]
    fn test_crossover_single_assignment_copies_first_parent() {
        let ctx = context((8, 18), 1);
        let mut rng = SmallRng::seed_from_u64(1);
        let p1 = construct(&ctx, &mut rng);
        let p2 = construct(&ctx, &mut rng);
        assert_eq!(crossover(&p1, &p2, &mut rng), p1);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let ctx = context((8, 18), 4);
        let mut rng = SmallRng::seed_from_u64(5);
        let original = construct(&ctx, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, &ctx, 0.0, &mut rng);
        assert_eq!(mutated, original);
    }

    #[test]
    fn test_full_rate_moves_and_stays_clash_free() {
        let ctx = context((8, 18), 4);
        let mut rng = SmallRng::seed_from_u64(8);
        let original = construct(&ctx, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, &ctx, 1.0, &mut rng);

        for (before, after) in original.generated.iter().zip(&mutated.generated) {
            assert!(after.placement.is_placed());
            assert_ne!(before.placement, after.placement);
        }
        let mut held = HashSet::new();
        for a in mutated.assignments() {
            for (room, slot) in a.room_slots() {
                assert!(held.insert((room.to_string(), *slot)));
            }
        }
    }

    #[test]
    fn test_mutation_keeps_curriculum_hours() {
        let calendar = WeeklyCalendar::from_windows(
            &[TimeWindow::new(Weekday::Monday, 8, 22), TimeWindow::new(Weekday::Tuesday, 8, 22)],
            CurriculumRules::default(),
        );
        let demands = (0..4)
            .map(|i| {
                let curriculum = if i % 2 == 0 { CurriculumType::Special } else { CurriculumType::Regular };
                CourseDemand::new(format!("CS{i:03}"), 1, CourseKind::Theory, "lecture", curriculum, 2)
                    .with_teacher(format!("T{i}"))
            })
            .collect();
        let ctx = ScheduleContext::new(calendar, &[Room::new("A1", "lecture")], &[], &[], demands, FitnessWeights::default());
        let mut rng = SmallRng::seed_from_u64(13);
        let mut c = construct(&ctx, &mut rng);
        for _ in 0..10 {
            mutate(&mut c, &ctx, 1.0, &mut rng);
            for a in &c.generated {
                let curriculum = a.session.curriculum().expect("course session");
                assert!(a.placement.slots().iter().all(|s| ctx.calendar().is_valid(s, curriculum)));
            }
        }
    }

    #[test]
    fn test_mutation_can_unplace_when_full() {
        // Two rooms, one hour: two sessions fill everything, so a re-placement
        // that excludes its own slot has nowhere to go.
        let ctx = context((8, 9), 2);
        let mut rng = SmallRng::seed_from_u64(2);
        let mut c = construct(&ctx, &mut rng);
        assert_eq!(c.unplaced_count(), 0);
        mutate(&mut c, &ctx, 1.0, &mut rng);
        assert_eq!(c.generated[0].placement, Placement::Unplaced { hours: 1 });
        assert_eq!(c.generated[1].placement.slots(), &[TimeSlot::new(Weekday::Monday, 8)]);
    }
}
