//! Timetable GA problem definition.
//!
//! Bridges the scheduler (constructor, fitness) and the genetic operators
//! to the generic [`GaProblem`] driver.

use rand::Rng;

use super::operators::{crossover, mutate};
use super::GaProblem;
use crate::models::Candidate;
use crate::scheduler::{construct, evaluate, ScheduleContext};

/// GA problem over one run's [`ScheduleContext`].
///
/// # Example
/// ```no_run
/// use timetable_ga::ga::{GaConfig, GaRunner, TimetableProblem};
/// # use timetable_ga::scheduler::ScheduleContext;
/// # fn run(ctx: &ScheduleContext) {
/// let problem = TimetableProblem::new(ctx, 0.02);
/// let result = GaRunner::run(&problem, &GaConfig::default().with_seed(7));
/// # }
/// ```
pub struct TimetableProblem<'a> {
    ctx: &'a ScheduleContext,
    mutation_rate: f64,
}

impl<'a> TimetableProblem<'a> {
    /// Creates a problem. `mutation_rate` is clamped to `[0, 1]`.
    pub fn new(ctx: &'a ScheduleContext, mutation_rate: f64) -> Self {
        let mutation_rate = if mutation_rate.is_nan() { 0.0 } else { mutation_rate.clamp(0.0, 1.0) };
        Self { ctx, mutation_rate }
    }

    pub fn context(&self) -> &ScheduleContext {
        self.ctx
    }
}

impl GaProblem for TimetableProblem<'_> {
    type Individual = Candidate;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Candidate {
        construct(self.ctx, rng)
    }

    fn evaluate(&self, individual: &Candidate) -> i64 {
        evaluate(individual, self.ctx)
    }

    fn crossover<R: Rng>(&self, p1: &Candidate, p2: &Candidate, rng: &mut R) -> Candidate {
        crossover(p1, p2, rng)
    }

    fn mutate<R: Rng>(&self, individual: &mut Candidate, rng: &mut R) {
        mutate(individual, self.ctx, self.mutation_rate, rng);
    }
}
