//! Top-level scheduling entry point.
//!
//! # Pipeline
//! 1. Validate the configuration.
//! 2. Ingest raw records (skipped records are kept as issues).
//! 3. Build the weekly calendar and the run context (blackout applied).
//! 4. Capacity precheck; any shortfall aborts the run.
//! 5. Genetic search, `independent_runs` times; the best result wins.
//! 6. Flatten the best candidate into output rows.
//!
//! Every run starts from fresh state; nothing is cached between calls.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::ga::{CancelToken, GaResult, GaRunner, StopReason, TimetableProblem};
use crate::ingest::{ingest, RecordIssue};
use crate::models::{Candidate, ScheduleInput, ScheduleRow, WeeklyCalendar};
use crate::precheck::check_capacity;
use crate::scheduler::ScheduleContext;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// One row per scheduled hour, sorted by course code, day, hour.
    pub rows: Vec<ScheduleRow>,
    /// The winning candidate.
    pub candidate: Candidate,
    /// Score of the winning candidate.
    pub fitness: i64,
    /// Names of demands that found no feasible window.
    pub unplaced: Vec<String>,
    /// Input records skipped during ingestion.
    pub skipped: Vec<RecordIssue>,
    /// Generations bred by the winning search.
    pub generations: usize,
    pub stop_reason: StopReason,
    /// Best score per generation of the winning search.
    pub history: Vec<i64>,
    /// Seed of the winning search.
    pub seed: u64,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl ScheduleOutcome {
    /// Whether every demand was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Weekly timetable generator.
///
/// # Example
/// ```
/// use timetable_ga::{GaConfig, SchedulerConfig, TimetableEngine};
/// use timetable_ga::models::{CourseRecord, RoomRecord, ScheduleInput, TimeWindowRecord, Weekday};
///
/// let input = ScheduleInput {
///     time_windows: vec![TimeWindowRecord::new(Weekday::Monday, 8, 12)],
///     rooms: vec![RoomRecord::new("A101", "lecture")],
///     courses: vec![CourseRecord::new("CS101", "lecture").with_teacher("Ann").with_theory_hours(2)],
///     ..ScheduleInput::default()
/// };
/// let config = SchedulerConfig::default()
///     .with_ga(GaConfig::default().with_population_size(8).with_max_generations(10).with_seed(1));
/// let outcome = TimetableEngine::new(config).generate(&input).unwrap();
/// assert_eq!(outcome.rows.len(), 2);
/// assert!(outcome.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableEngine {
    config: SchedulerConfig,
}

impl TimetableEngine {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Builds a timetable for `input`.
    pub fn generate(&self, input: &ScheduleInput) -> SchedulerResult<ScheduleOutcome> {
        self.generate_with_cancel(input, &CancelToken::new())
    }

    /// Builds a timetable, stopping early once `cancel` is set.
    ///
    /// A cancelled run still returns the best timetable found so far.
    pub fn generate_with_cancel(&self, input: &ScheduleInput, cancel: &CancelToken) -> SchedulerResult<ScheduleOutcome> {
        let started = Instant::now();
        self.config.validate()?;

        let ingested = ingest(input);
        if ingested.rooms.is_empty() {
            return Err(SchedulerError::NoRooms { skipped: ingested.issues });
        }
        let calendar = WeeklyCalendar::from_windows(&ingested.windows, self.config.curriculum.clone());
        if calendar.is_empty() {
            return Err(SchedulerError::NoTimeWindows { skipped: ingested.issues });
        }
        info!(
            rooms = ingested.rooms.len(),
            demands = ingested.demands.len(),
            locked = ingested.locked.len(),
            activities = ingested.activities.len(),
            skipped = ingested.issues.len(),
            "input ingested"
        );

        let ctx = ScheduleContext::new(
            calendar,
            &ingested.rooms,
            &ingested.locked,
            &ingested.activities,
            ingested.demands,
            self.config.fitness,
        );
        let mut report = check_capacity(ctx.calendar(), ctx.pool(), &ingested.rooms, &ingested.locked, ctx.demands());
        if !report.is_feasible() {
            report.skipped = ingested.issues;
            warn!(shortfalls = report.shortfalls.len(), "capacity precheck failed: {report}");
            return Err(SchedulerError::CapacityInsufficient(report));
        }

        let best = self.search(&ctx, cancel)?;

        let unplaced: Vec<String> = best
            .best
            .unplaced()
            .map(|a| a.session.name().to_string())
            .collect();
        if !unplaced.is_empty() {
            warn!(count = unplaced.len(), "some demands could not be placed");
        }

        Ok(ScheduleOutcome {
            rows: best.best.to_rows(),
            fitness: best.best_fitness,
            unplaced,
            skipped: ingested.issues,
            generations: best.generations,
            stop_reason: best.stop_reason,
            history: best.history,
            seed: best.seed,
            elapsed: started.elapsed(),
            candidate: best.best,
        })
    }

    /// Runs `independent_runs` searches with derived seeds, keeping the
    /// first best.
    fn search(&self, ctx: &ScheduleContext, cancel: &CancelToken) -> SchedulerResult<GaResult<Candidate>> {
        let ga = &self.config.ga;
        let problem = TimetableProblem::new(ctx, ga.mutation_rate);
        let base = ga.seed.unwrap_or_else(|| rand::rng().random());
        let mut seeds = SmallRng::seed_from_u64(base);

        let mut best: Option<GaResult<Candidate>> = None;
        for run in 0..ga.independent_runs {
            let seed = if run == 0 { base } else { seeds.random() };
            let result = GaRunner::run_with_cancel(&problem, &ga.clone().with_seed(seed), cancel)?;
            info!(run, seed, fitness = result.best_fitness, "independent run finished");
            let cancelled = result.stop_reason == StopReason::Cancelled;
            if best.as_ref().map_or(true, |b| result.best_fitness > b.best_fitness) {
                best = Some(result);
            }
            if cancelled {
                break;
            }
        }
        best.ok_or_else(|| SchedulerError::Unexpected("no search was run".to_string()))
    }
}
