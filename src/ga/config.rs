//! GA driver parameters.

use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};

/// GA parameters.
///
/// # Example
/// ```
/// use timetable_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Candidates per generation.
    pub population_size: usize,
    /// Generation budget.
    pub max_generations: usize,
    /// Top candidates copied unchanged into the next generation.
    pub elite_count: usize,
    /// Parents are drawn from this many top candidates.
    pub parent_pool: usize,
    /// Per-assignment re-placement probability.
    pub mutation_rate: f64,
    /// Stop after this many consecutive generations without a change in the best score.
    pub stall_generations: usize,
    /// Independent searches; the best result is kept.
    pub independent_runs: usize,
    /// Master seed. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Build and breed candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_generations: 300,
            elite_count: 5,
            parent_pool: 5,
            mutation_rate: 0.02,
            stall_generations: 100,
            independent_runs: 1,
            seed: None,
            parallel: true,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    pub fn with_parent_pool(mut self, size: usize) -> Self {
        self.parent_pool = size;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_stall_generations(mut self, generations: usize) -> Self {
        self.stall_generations = generations;
        self
    }

    pub fn with_independent_runs(mut self, runs: usize) -> Self {
        self.independent_runs = runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rejects parameter combinations the driver cannot run.
    pub fn validate(&self) -> SchedulerResult<()> {
        let invalid = |msg: String| Err(SchedulerError::InvalidConfig(msg));
        if self.population_size < 2 {
            return invalid(format!("population_size must be >= 2, got {}", self.population_size));
        }
        if self.elite_count >= self.population_size {
            return invalid(format!(
                "elite_count ({}) must be below population_size ({})",
                self.elite_count, self.population_size
            ));
        }
        if self.parent_pool < 2 {
            return invalid(format!("parent_pool must be >= 2, got {}", self.parent_pool));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!("mutation_rate must be within [0, 1], got {}", self.mutation_rate));
        }
        if self.independent_runs == 0 {
            return invalid("independent_runs must be >= 1".to_string());
        }
        Ok(())
    }
}
