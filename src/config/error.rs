use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid horizon: end date {end} is before start date {start}")]
    InvalidHorizon { start: NaiveDate, end: NaiveDate },

    #[error("Invalid window for shift {shift}: start must be before end")]
    InvalidShiftWindow { shift: String },
}
