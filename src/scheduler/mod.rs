//! Candidate construction and scoring.
//!
//! # Algorithm
//!
//! A candidate is built greedily from a private copy of the slot pool:
//! fixed sessions are seeded first, then unlocked demands are placed in
//! longest-first, scarcest-first order. Each placement takes the first
//! feasible consecutive window per compatible room and picks the least
//! loaded room among them ("consecutive-times" search). Load balancing is
//! achieved by this room choice, not by a scoring term.
//!
//! Fitness is an integer score (higher is better) that rewards clean
//! teacher/room usage and compact blocks and penalizes unplaced hours,
//! blackout hits, illegal hours and double bookings.
//!
//! # References
//!
//! - Graham (1969), "Bounds on multiprocessing timing anomalies" (LPT ordering)
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod constructor;
mod fitness;
mod placement;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

pub use constructor::construct;
pub use fitness::{evaluate, FitnessWeights};
pub use placement::{place, UsageTracker};

use crate::models::{
    Assignment, BlockingActivity, CourseDemand, LockedAssignment, Origin, Placement, Room, Session, SlotPool,
    TimeSlot, WeeklyCalendar,
};

/// Immutable per-run data shared by every candidate.
///
/// Rebuilt from scratch for each run; nothing here outlives the run.
#[derive(Debug, Clone)]
pub struct ScheduleContext {
    calendar: WeeklyCalendar,
    blocked: HashSet<TimeSlot>,
    pool: SlotPool,
    rooms_by_type: BTreeMap<String, Vec<String>>,
    fixed: Arc<[Assignment]>,
    demands: Vec<CourseDemand>,
    sessions: Vec<Arc<Session>>,
    order: Vec<usize>,
    weights: FitnessWeights,
}

impl ScheduleContext {
    /// Builds the run context: blackout-applied pool, fixed assignments and
    /// the construction order of `demands`.
    pub fn new(
        calendar: WeeklyCalendar,
        rooms: &[Room],
        locked: &[LockedAssignment],
        activities: &[BlockingActivity],
        demands: Vec<CourseDemand>,
        weights: FitnessWeights,
    ) -> Self {
        let blocked: HashSet<TimeSlot> = activities.iter().flat_map(|a| a.slots()).collect();

        let mut pool = SlotPool::build(&calendar, rooms);
        pool.apply_blackout(&blocked);

        let mut rooms_by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for room in rooms {
            rooms_by_type
                .entry(room.room_type.clone())
                .or_default()
                .push(room.name.clone());
        }

        let fixed: Vec<Assignment> = activities
            .iter()
            .map(|a| {
                Assignment::new(
                    Arc::new(Session::Activity(a.clone())),
                    Origin::Blocking,
                    Placement::Placed {
                        room: None,
                        slots: a.slots(),
                    },
                )
            })
            .chain(locked.iter().map(|l| {
                Assignment::new(
                    Arc::new(Session::Course(l.demand.clone())),
                    Origin::Locked,
                    Placement::Placed {
                        room: Some(l.room.clone()),
                        slots: l.slots(),
                    },
                )
            }))
            .collect();

        let sessions = demands
            .iter()
            .map(|d| Arc::new(Session::Course(d.clone())))
            .collect();

        // Longest first, then fewest compatible rooms. Stable, so ties keep
        // ingestion order.
        let mut order: Vec<usize> = (0..demands.len()).collect();
        order.sort_by_key(|&i| {
            let d = &demands[i];
            let compatible = rooms_by_type.get(&d.room_type).map_or(0, Vec::len);
            (std::cmp::Reverse(d.hours), compatible)
        });

        Self {
            calendar,
            blocked,
            pool,
            rooms_by_type,
            fixed: fixed.into(),
            demands,
            sessions,
            order,
            weights,
        }
    }

    pub fn calendar(&self) -> &WeeklyCalendar {
        &self.calendar
    }

    /// Slots covered by blocking activities.
    pub fn blocked(&self) -> &HashSet<TimeSlot> {
        &self.blocked
    }

    /// Base pool: every room's calendar slots minus the blackout.
    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    /// Rooms serving `room_type`, in input order.
    pub fn rooms_of_type(&self, room_type: &str) -> &[String] {
        self.rooms_by_type.get(room_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Locked and blackout assignments, shared by all candidates.
    pub fn fixed(&self) -> &Arc<[Assignment]> {
        &self.fixed
    }

    /// Unlocked demands in ingestion order.
    pub fn demands(&self) -> &[CourseDemand] {
        &self.demands
    }

    /// Shared session for the demand at `index`.
    pub fn session(&self, index: usize) -> Option<&Arc<Session>> {
        self.sessions.get(index)
    }

    /// Demand indices in construction order.
    pub fn construction_order(&self) -> &[usize] {
        &self.order
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }
}
