//! Candidate solutions: placed exams and the warnings gathered building them.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::Id;

/// One (subject, group) assigned to one (date, shift, room, start, end).
///
/// Holds only value types; the student directory stays outside as a
/// formatting side table. `end - start == duration_minutes` is maintained by
/// every operator that touches a placement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedExam {
    pub date: NaiveDate,
    pub shift: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub room: String,
    pub subject: String,
    pub duration_minutes: u32,
    pub student_ids: Vec<Id>,
}

impl PlacedExam {
    /// Start instant anchored at the exam date.
    pub fn start_dt(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    /// End instant anchored at the exam date. An end that wrapped past
    /// midnight compares before the start, exactly as the wall-clock pair
    /// round-trips.
    pub fn end_dt(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    /// Half-open interval overlap: `start < other.end && end > other.start`.
    /// Back-to-back placements do not overlap.
    pub fn overlaps(&self, other: &PlacedExam) -> bool {
        self.start_dt() < other.end_dt() && self.end_dt() > other.start_dt()
    }

    /// Re-derives `end` from `start` and the current duration. Used after a
    /// payload swap transplants a different duration into this slot.
    pub fn recompute_end(&mut self) {
        let end = self.start_dt() + Duration::minutes(i64::from(self.duration_minutes));
        self.end = end.time();
    }
}

/// An ordered collection of placements plus human-readable warnings
/// (unplaceable subjects, duration inconsistencies). Immutable snapshot;
/// the optimizer deep-copies on adoption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub placements: Vec<PlacedExam>,
    pub warnings: Vec<String>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(start: (u32, u32), end: (u32, u32)) -> PlacedExam {
        PlacedExam {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            shift: "Morning".to_string(),
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            room: "Phòng 1".to_string(),
            subject: "Math".to_string(),
            duration_minutes: 60,
            student_ids: vec!["s1".to_string()],
        }
    }

    #[test]
    fn overlap_is_half_open() {
        let a = placement((8, 0), (9, 0));
        let b = placement((9, 0), (10, 0));
        let c = placement((8, 30), (9, 30));
        assert!(!a.overlaps(&b), "back-to-back must not overlap");
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn different_dates_never_overlap() {
        let a = placement((8, 0), (9, 0));
        let mut b = placement((8, 0), (9, 0));
        b.date = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn recompute_end_tracks_duration() {
        let mut p = placement((8, 0), (9, 0));
        p.duration_minutes = 95;
        p.recompute_end();
        assert_eq!(p.end, NaiveTime::from_hms_opt(9, 35, 0).unwrap());
        let span = p.end_dt() - p.start_dt();
        assert_eq!(span.num_minutes(), 95);
    }

    #[test]
    fn empty_solution() {
        let s = Solution::default();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }
}
