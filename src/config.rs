//! Engine configuration.
//!
//! Every section deserializes with defaults, so a partial JSON document
//! (or none at all) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};
use crate::ga::GaConfig;
use crate::models::CurriculumRules;
use crate::scheduler::FitnessWeights;

/// Top-level configuration for [`TimetableEngine`](crate::TimetableEngine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Search parameters.
    pub ga: GaConfig,
    /// Score weights.
    pub fitness: FitnessWeights,
    /// Legal hours per curriculum.
    pub curriculum: CurriculumRules,
}

impl SchedulerConfig {
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_fitness(mut self, fitness: FitnessWeights) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn with_curriculum(mut self, curriculum: CurriculumRules) -> Self {
        self.curriculum = curriculum;
        self
    }

    /// Checks GA parameters and curriculum hour ranges.
    pub fn validate(&self) -> SchedulerResult<()> {
        self.ga.validate()?;
        let malformed = self.curriculum.malformed_ranges();
        if !malformed.is_empty() {
            return Err(SchedulerError::InvalidConfig(format!(
                "malformed curriculum hours: {}",
                malformed.join(", ")
            )));
        }
        Ok(())
    }
}
