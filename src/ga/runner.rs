//! Generational GA driver.
//!
//! # Algorithm
//! 1. Build `population_size` individuals.
//! 2. Sort descending by fitness (stable) and keep the best-ever individual;
//!    only a strictly higher score replaces it.
//! 3. Stop when the generation's best score has not changed for
//!    `stall_generations` consecutive generations, when `max_generations`
//!    have been bred, or when cancellation was requested.
//! 4. Copy the top `elite_count` unchanged; fill the rest with children of
//!    two distinct parents drawn from the top `parent_pool`, each crossed over,
//!    mutated and evaluated.
//!
//! # Determinism
//! A master generator seeded from the config draws one seed per individual
//! to build. Each individual is produced from its own generator, so the
//! outcome depends only on the seed, whether or not rayon is used.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::{CancelToken, GaConfig, GaProblem};
use crate::error::{SchedulerError, SchedulerResult};

/// Why a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Best score unchanged for `stall_generations` generations.
    Stalled,
    /// `max_generations` reached.
    BudgetExhausted,
    /// Cancelled through a [`CancelToken`].
    Cancelled,
}

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    /// Best individual ever seen.
    pub best: I,
    pub best_fitness: i64,
    /// Generations bred after the initial population.
    pub generations: usize,
    pub stop_reason: StopReason,
    /// Best score of each evaluated generation, initial population first.
    pub history: Vec<i64>,
    /// Master seed actually used.
    pub seed: u64,
}

#[derive(Clone)]
struct Scored<I> {
    individual: I,
    fitness: i64,
}

/// Runs the GA.
pub struct GaRunner;

impl GaRunner {
    /// Runs a search to completion.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> SchedulerResult<GaResult<P::Individual>> {
        Self::run_with_cancel(problem, config, &CancelToken::new())
    }

    /// Runs a search, checking `cancel` between generations.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: &CancelToken,
    ) -> SchedulerResult<GaResult<P::Individual>> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut master = SmallRng::seed_from_u64(seed);
        let started = Instant::now();
        info!(
            seed,
            population = config.population_size,
            max_generations = config.max_generations,
            "starting genetic search"
        );

        let seeds = draw_seeds(&mut master, config.population_size);
        let mut population = map_seeds(config.parallel, &seeds, |s| {
            let mut rng = SmallRng::seed_from_u64(s);
            let individual = problem.create_individual(&mut rng);
            let fitness = problem.evaluate(&individual);
            Scored { individual, fitness }
        });

        let mut best: Option<Scored<P::Individual>> = None;
        let mut history = Vec::new();
        let mut previous: Option<i64> = None;
        let mut stall = 0usize;
        let mut generations = 0usize;

        let stop_reason = loop {
            population.sort_by(|a, b| b.fitness.cmp(&a.fitness));
            let Some(leader) = population.first() else {
                return Err(SchedulerError::Unexpected("empty population".to_string()));
            };
            if best.as_ref().map_or(true, |b| leader.fitness > b.fitness) {
                best = Some(leader.clone());
            }
            history.push(leader.fitness);
            stall = match previous {
                Some(p) if p == leader.fitness => stall + 1,
                _ => 0,
            };
            previous = Some(leader.fitness);
            debug!(generation = generations, best = leader.fitness, stall, "generation evaluated");

            if stall >= config.stall_generations {
                break StopReason::Stalled;
            }
            if generations >= config.max_generations {
                break StopReason::BudgetExhausted;
            }
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let elite = config.elite_count.min(population.len());
            let pool = config.parent_pool.min(population.len());
            let seeds = draw_seeds(&mut master, config.population_size - elite);
            let parents = &population[..pool];
            let children = map_seeds(config.parallel, &seeds, |s| {
                let mut rng = SmallRng::seed_from_u64(s);
                let (i, j) = pick_parents(pool, &mut rng);
                let mut child = problem.crossover(&parents[i].individual, &parents[j].individual, &mut rng);
                problem.mutate(&mut child, &mut rng);
                let fitness = problem.evaluate(&child);
                Scored { individual: child, fitness }
            });
            population.truncate(elite);
            population.extend(children);
            generations += 1;
        };

        let best = best.ok_or_else(|| SchedulerError::Unexpected("search produced no individual".to_string()))?;
        info!(
            best = best.fitness,
            generations,
            reason = ?stop_reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "genetic search finished"
        );
        Ok(GaResult {
            best: best.individual,
            best_fitness: best.fitness,
            generations,
            stop_reason,
            history,
            seed,
        })
    }
}

fn draw_seeds(master: &mut SmallRng, count: usize) -> Vec<u64> {
    (0..count).map(|_| master.random()).collect()
}

fn map_seeds<T, F>(parallel: bool, seeds: &[u64], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(u64) -> T + Sync + Send,
{
    if parallel {
        seeds.par_iter().map(|&s| f(s)).collect()
    } else {
        seeds.iter().map(|&s| f(s)).collect()
    }
}

/// Two distinct indices below `n` (the same index twice when `n < 2`).
fn pick_parents<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    if n < 2 {
        return (0, 0);
    }
    let picked = index::sample(rng, n, 2);
    (picked.index(0), picked.index(1))
}
