//! Greedy candidate constructor.
//!
//! # Algorithm
//! 1. Clone the run's base pool and seed it with every fixed assignment.
//! 2. Place unlocked demands in construction order (most hours first, then
//!    fewest compatible rooms).
//! 3. Store each result at the demand's ingestion index, so every candidate
//!    of a run lines up position by position for crossover.

use rand::Rng;

use super::placement::{place, UsageTracker};
use super::ScheduleContext;
use crate::models::{Assignment, Candidate, Origin, Placement};

/// Builds one complete candidate.
pub fn construct<R: Rng>(ctx: &ScheduleContext, rng: &mut R) -> Candidate {
    let mut pool = ctx.pool().clone();
    let mut usage = UsageTracker::from_assignments(ctx.fixed().iter());
    for a in ctx.fixed().iter() {
        if let Some(room) = a.placement.room() {
            pool.reserve(room, a.placement.slots());
        }
    }

    let demands = ctx.demands();
    let mut placements: Vec<Placement> = demands
        .iter()
        .map(|d| Placement::Unplaced { hours: d.hours })
        .collect();

    for &i in ctx.construction_order() {
        let demand = &demands[i];
        let placement = place(demand, ctx, &usage, &mut pool, rng);
        if let Some(session) = ctx.session(i) {
            usage.occupy(&Assignment::new(session.clone(), Origin::Generated, placement.clone()));
        }
        placements[i] = placement;
    }

    let generated = placements
        .into_iter()
        .enumerate()
        .filter_map(|(i, placement)| {
            ctx.session(i)
                .map(|session| Assignment::new(session.clone(), Origin::Generated, placement))
        })
        .collect();

    Candidate::new(ctx.fixed().clone(), generated)
}
