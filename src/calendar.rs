//! Working-date enumeration for the scheduling horizon.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

/// Enumerates the working dates in `[start, end]`, in chronological order.
///
/// A date qualifies when its weekday (0 = Monday .. 6 = Sunday) is not in
/// `off_days`. An inverted range yields an empty list.
pub fn working_dates(start: NaiveDate, end: NaiveDate, off_days: &HashSet<u8>) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !off_days.contains(&(d.weekday().num_days_from_monday() as u8)))
        .collect()
}
