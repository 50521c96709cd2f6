//! Room model and demand-driven room auto-sizing.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::ScheduleConfig;
use crate::roster::Subject;

/// A named slot hosting one exam session (subject + group) at a time.
/// Student bounds are config-level, not per-room.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub name: String,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Estimates a sufficient room count and writes it into `config.rooms`.
///
/// Called when no rooms are configured. Demand is total exam-minutes with
/// each subject split into `ceil(n / max_students_per_room)` batches;
/// capacity is the sum of shift-window minutes over all working dates. The
/// estimate carries a 20% buffer for fragmentation (trailing shift minutes
/// and break intervals) and is floored by the peak number of parallel
/// batches any single subject needs.
///
/// A missing or zero `max_students_per_room` defaults to 50 and is written
/// back so splitting and cost use the same bound.
pub fn auto_size(config: &mut ScheduleConfig, subjects: &[Subject], dates: &[NaiveDate]) {
    let max_per_room = match config.max_students() {
        Some(m) => m,
        None => {
            config.max_students_per_room = Some(50);
            50
        }
    };

    let mut demand_minutes: u64 = 0;
    let mut peak_parallel: usize = 1;
    for subject in subjects {
        let batches = subject.student_ids.len().div_ceil(max_per_room as usize);
        demand_minutes += batches as u64 * u64::from(subject.duration_minutes);
        peak_parallel = peak_parallel.max(batches);
    }

    let capacity_minutes: u64 = dates
        .iter()
        .flat_map(|_| config.shifts.iter())
        .filter_map(|shift| config.window(shift))
        .map(|w| w.minutes() as u64)
        .sum();

    let estimated = if capacity_minutes == 0 {
        1
    } else {
        ((demand_minutes as f64 * 1.2) / capacity_minutes as f64).ceil() as usize
    };
    let count = estimated.max(peak_parallel).max(1);

    debug!(
        rooms = count,
        peak_parallel,
        demand_minutes,
        capacity_minutes,
        "auto-generating rooms"
    );

    config.rooms = (1..=count).map(|i| Room::new(format!("Phòng {i}"))).collect();
}
