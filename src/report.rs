//! Flattening a solution into per-student result rows.

use chrono::NaiveDate;

use crate::roster::StudentDirectory;
use crate::solution::Solution;
use crate::Id;

/// One line of the published timetable: a single student sitting a single
/// exam. Times are rendered wall-clock `"HH:MM"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExamRow {
    pub student_id: Id,
    pub student_name: String,
    pub subject: String,
    pub exam_date: NaiveDate,
    pub shift: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
}

/// Emits one row per (placement, student), resolving display names through
/// the directory. A missing directory entry renders as `"Unknown"`. Row
/// order follows placement order but carries no meaning.
pub fn flatten(solution: &Solution, directory: &StudentDirectory) -> Vec<ExamRow> {
    let mut rows = Vec::new();
    for p in &solution.placements {
        for id in &p.student_ids {
            rows.push(ExamRow {
                student_id: id.clone(),
                student_name: directory.name_of(id).unwrap_or("Unknown").to_string(),
                subject: p.subject.clone(),
                exam_date: p.date,
                shift: p.shift.clone(),
                start_time: p.start.format("%H:%M").to_string(),
                end_time: p.end.format("%H:%M").to_string(),
                room: p.room.clone(),
            });
        }
    }
    rows
}
