//! Scheduling configuration: horizon, shifts, rooms, and group-size bounds.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};

use crate::rooms::Room;

pub mod error;
pub use error::ConfigError;

/// Named time window within a date during which exams may be placed.
///
/// An exam must satisfy `start <= exam.start` and `exam.end <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Window length in minutes.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Configuration for one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleConfig {
    // --- Horizon ---
    /// First candidate exam date (inclusive).
    pub start_date: NaiveDate,
    /// Last candidate exam date (inclusive).
    pub end_date: NaiveDate,
    /// Weekdays excluded from the horizon, 0 = Monday .. 6 = Sunday.
    pub off_days: HashSet<u8>,

    // --- Shifts ---
    /// Ordered shift names tried during placement.
    pub shifts: Vec<String>,
    /// Time window per shift name. A shift listed in `shifts` with no window
    /// here fails construction at solve time, not at validation.
    pub shift_times: HashMap<String, ShiftWindow>,
    /// Gap enforced between back-to-back exams in the same room and shift.
    pub break_minutes: u32,

    // --- Rooms ---
    /// Available rooms. Empty triggers auto-sizing (see [`crate::rooms`]).
    pub rooms: Vec<Room>,
    /// Lower bound on students per room, if set. Zero counts as unset.
    pub min_students_per_room: Option<u32>,
    /// Upper bound on students per room, if set. Zero counts as unset.
    pub max_students_per_room: Option<u32>,
}

impl ScheduleConfig {
    /// Checks the hard configuration invariants.
    ///
    /// Fails with [`ConfigError::InvalidHorizon`] when the end date precedes
    /// the start date, and [`ConfigError::InvalidShiftWindow`] when any
    /// declared window is empty or inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_date < self.start_date {
            return Err(ConfigError::InvalidHorizon {
                start: self.start_date,
                end: self.end_date,
            });
        }
        for (name, window) in &self.shift_times {
            if window.start >= window.end {
                return Err(ConfigError::InvalidShiftWindow {
                    shift: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Effective minimum group size: `None` when unset or zero.
    pub fn min_students(&self) -> Option<u32> {
        self.min_students_per_room.filter(|&m| m > 0)
    }

    /// Effective maximum group size: `None` when unset or zero.
    pub fn max_students(&self) -> Option<u32> {
        self.max_students_per_room.filter(|&m| m > 0)
    }

    /// Window for the given shift name, if configured.
    pub fn window(&self, shift: &str) -> Option<ShiftWindow> {
        self.shift_times.get(shift).copied()
    }
}

impl Default for ScheduleConfig {
    /// One working week with the stock two-shift day: 07:30-11:30 and
    /// 13:30-17:30, Saturday and Sunday off, 30-minute breaks.
    fn default() -> Self {
        let mut shift_times = HashMap::new();
        shift_times.insert(
            "Morning".to_string(),
            ShiftWindow::new(hm(7, 30), hm(11, 30)),
        );
        shift_times.insert(
            "Afternoon".to_string(),
            ShiftWindow::new(hm(13, 30), hm(17, 30)),
        );

        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date"),
            off_days: HashSet::from([5, 6]),
            shifts: vec!["Morning".to_string(), "Afternoon".to_string()],
            shift_times,
            break_minutes: 30,
            rooms: Vec::new(),
            min_students_per_room: None,
            max_students_per_room: None,
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}
