use thiserror::Error;

use crate::config::ConfigError;

/// Fatal problems detected before any search work starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No working dates remain between the horizon bounds after off-day exclusion")]
    EmptyHorizon,

    #[error("No students to schedule")]
    EmptyRoster,
}

/// Failure of one restart's greedy construction. The optimizer logs it and
/// moves on to the next restart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitializerError {
    #[error("Shift {0} has no configured time window")]
    MissingShiftWindow(String),
}
