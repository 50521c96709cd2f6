pub mod error;
pub mod hill_climbing;

pub use error::SolveError;
pub use hill_climbing::HillClimbingScheduler;

use crate::solution::Solution;

/// Algorithm producing an exam timetable from a prepared problem instance.
///
/// Implementors own their configuration, derived problem data, and random
/// source; `solve` consumes randomness, so the receiver is mutable. A
/// solution is always returned: residual constraint violations surface as
/// cost and warnings, never as errors.
pub trait SchedulingAlgorithm {
    /// Runs the search and returns the best solution found.
    fn solve(&mut self) -> Solution;
}
