//! Hill climbing with random restarts for exam timetabling.
//!
//! Each restart pairs one greedy construction with one stochastic descent:
//!
//! 1. **Construction**: subjects are shuffled and greedily placed into the
//!    earliest viable (date, shift, rooms) slots, splitting cohorts across
//!    rooms and honoring student conflicts strictly (see [`initializer`]).
//! 2. **Descent**: the swap operator exchanges subject payloads between two
//!    occupied slots and the move is kept only when it lowers the weighted
//!    penalty (see [`neighborhood`] and [`cost`]). The cost function is the
//!    sole arbiter of feasibility during descent.
//! 3. **Adoption**: the best-by-cost snapshot is deep-copied across restarts
//!    and returned; a best cost of zero stops the search early.
//!
//! Construction failures skip their restart. A solution is returned even
//! when residual cost remains; per-subject placement failures surface as
//! warnings on the solution, never as errors.
//!
//! All randomness (subject shuffle, swap indices) flows from a single
//! `StdRng` seeded at construction, so runs with identical inputs and seed
//! are reproducible.
//!
//! # Module Structure
//!
//! - [`initializer`] - greedy candidate construction
//! - [`neighborhood`] - payload-swap perturbation operator
//! - [`cost`] - weighted penalty evaluation

mod cost;
mod initializer;
mod neighborhood;


use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::algorithms::error::SolveError;
use crate::algorithms::SchedulingAlgorithm;
use crate::calendar;
use crate::config::ScheduleConfig;
use crate::rooms;
use crate::roster::{Student, SubjectIndex};
use crate::solution::{PlacedExam, Solution};

/// Best snapshot retained across restarts.
#[derive(Debug, Clone)]
struct Candidate {
    placements: Vec<PlacedExam>,
    warnings: Vec<String>,
    cost: f64,
}

/// Exam timetabling by greedy construction plus restart-based hill climbing.
///
/// # Lifecycle
///
/// 1. Call [`HillClimbingScheduler::new`] with configuration, roster, and an
///    RNG seed. Hard configuration errors are rejected here, before any
///    search work; empty room lists are auto-sized.
/// 2. Optionally tune the search with [`HillClimbingScheduler::with_limits`].
/// 3. Call [`SchedulingAlgorithm::solve`] to run the search and collect the
///    best solution with its warnings.
#[derive(Debug)]
pub struct HillClimbingScheduler {
    config: ScheduleConfig,
    subjects: SubjectIndex,
    dates: Vec<NaiveDate>,
    rng: StdRng,
    max_restarts: usize,
    max_iterations: usize,
}

impl HillClimbingScheduler {
    pub const DEFAULT_MAX_RESTARTS: usize = 5;
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

    /// Prepares a scheduler for the given problem.
    ///
    /// Validates the configuration, derives the subject index and the
    /// working-date horizon, and auto-sizes rooms when none are configured.
    ///
    /// # Errors
    ///
    /// [`SolveError::Config`] for an inverted horizon or shift window,
    /// [`SolveError::EmptyRoster`] when `students` is empty, and
    /// [`SolveError::EmptyHorizon`] when off-days eliminate every date.
    pub fn new(
        mut config: ScheduleConfig,
        students: &[Student],
        seed: u64,
    ) -> Result<Self, SolveError> {
        config.validate()?;
        if students.is_empty() {
            return Err(SolveError::EmptyRoster);
        }
        let dates = calendar::working_dates(config.start_date, config.end_date, &config.off_days);
        if dates.is_empty() {
            return Err(SolveError::EmptyHorizon);
        }
        let subjects = SubjectIndex::build(students);
        if config.rooms.is_empty() {
            rooms::auto_size(&mut config, subjects.subjects(), &dates);
        }
        Ok(Self {
            config,
            subjects,
            dates,
            rng: StdRng::seed_from_u64(seed),
            max_restarts: Self::DEFAULT_MAX_RESTARTS,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        })
    }

    /// Overrides the restart and per-restart iteration budgets.
    pub fn with_limits(mut self, max_restarts: usize, max_iterations: usize) -> Self {
        self.max_restarts = max_restarts;
        self.max_iterations = max_iterations;
        self
    }

    /// The effective configuration, with auto-sized rooms and the defaulted
    /// maximum group size written back.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// The working dates the search places exams on.
    pub fn working_dates(&self) -> &[NaiveDate] {
        &self.dates
    }
}

impl SchedulingAlgorithm for HillClimbingScheduler {
    fn solve(&mut self) -> Solution {
        debug!(
            restarts = self.max_restarts,
            iterations = self.max_iterations,
            subjects = self.subjects.len(),
            "starting hill climbing"
        );

        let mut best: Option<Candidate> = None;
        let mut failures: Vec<String> = Vec::new();

        for restart in 1..=self.max_restarts {
            let (mut current, warnings) = match initializer::build_candidate(
                &self.config,
                self.subjects.subjects(),
                &self.dates,
                &mut self.rng,
            ) {
                Ok(built) => built,
                Err(e) => {
                    warn!(restart, error = %e, "initialization failed, skipping restart");
                    failures.push(format!("initialization failed: {e}"));
                    continue;
                }
            };
            let mut current_cost = cost::candidate_cost(&current, &self.config);

            if best.is_none() {
                best = Some(Candidate {
                    placements: current.clone(),
                    warnings: warnings.clone(),
                    cost: current_cost,
                });
            }

            for _ in 0..self.max_iterations {
                let neighbor = neighborhood::swap_neighbor(&current, &mut self.rng);
                let neighbor_cost = cost::candidate_cost(&neighbor, &self.config);
                if neighbor_cost < current_cost {
                    current = neighbor;
                    current_cost = neighbor_cost;
                }
            }

            debug!(restart, cost = current_cost, "restart finished");

            if current_cost < best.as_ref().map_or(f64::INFINITY, |b| b.cost) {
                best = Some(Candidate {
                    placements: current,
                    warnings,
                    cost: current_cost,
                });
            }
            if best.as_ref().is_some_and(|b| b.cost == 0.0) {
                break;
            }
        }

        let mut all_warnings: Vec<String> = self.subjects.warnings().to_vec();
        match best {
            Some(b) => {
                all_warnings.extend(b.warnings);
                Solution {
                    placements: b.placements,
                    warnings: all_warnings,
                }
            }
            None => {
                all_warnings.extend(failures);
                Solution {
                    placements: Vec::new(),
                    warnings: all_warnings,
                }
            }
        }
    }
}
