//! Genetic search over timetables.
//!
//! A small generational GA: elitism, parents drawn from the top of the
//! sorted population, one-point crossover over the unlocked assignments and
//! re-placement mutation. The driver is generic over [`GaProblem`]; the
//! timetable encoding lives in [`TimetableProblem`].
//!
//! # Encoding
//!
//! An individual is a [`Candidate`](crate::models::Candidate): the shared
//! fixed part plus one assignment per unlocked demand, in ingestion order.
//! Because positions mean the same demand in every candidate, one-point
//! crossover always yields a child with exactly one assignment per demand.
//!
//! # Submodules
//!
//! - [`operators`]: crossover and mutation on candidates
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Burke et al. (1996), "A Memetic Algorithm for University Exam Timetabling"

mod config;
pub mod operators;
mod problem;
mod runner;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;

pub use config::GaConfig;
pub use problem::TimetableProblem;
pub use runner::{GaResult, GaRunner, StopReason};

/// A problem the GA driver can search. Fitness is maximized.
///
/// All methods take `&self` so one problem can be shared across worker
/// threads; per-individual randomness comes from the passed generator.
pub trait GaProblem: Send + Sync {
    type Individual: Clone + Send + Sync;

    /// Builds a fresh individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Scores an individual. Higher is better.
    fn evaluate(&self, individual: &Self::Individual) -> i64;

    /// Combines two parents into one child.
    fn crossover<R: Rng>(&self, p1: &Self::Individual, p2: &Self::Individual, rng: &mut R) -> Self::Individual;

    /// Perturbs an individual in place.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);
}

/// Cooperative cancellation flag, checked between generations.
///
/// Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The running search stops after the current
    /// generation and returns its best so far.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
