//! Weighted penalty evaluation of a candidate timetable.
//!
//! Room overlaps and student clashes carry weights large enough that the
//! descent treats them as hard even though the search itself is
//! unconstrained. Zero cost means no violation and maximal balance.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::ScheduleConfig;
use crate::solution::PlacedExam;

const MIN_BREACH_WEIGHT: f64 = 500.0;
const MAX_BREACH_WEIGHT: f64 = 1000.0;
const ROOM_OVERLAP_WEIGHT: f64 = 5000.0;
const STUDENT_CLASH_WEIGHT: f64 = 2000.0;
const OVERLOAD_BASE_WEIGHT: f64 = 50.0;
/// Exams per student per day tolerated before the overload penalty kicks in.
const MAX_EXAMS_PER_DAY: u32 = 2;
/// Same-day idle time (minutes) a student is allowed between first and last exam.
const GAP_TOLERANCE_MINUTES: f64 = 120.0;

/// Computes the weighted penalty of a candidate.
///
/// Pairwise terms (room overlap, student clash) are charged once per pair,
/// when the scan reaches the later placement. Interval comparisons are
/// half-open: `start < other.end && end > other.start`.
pub fn candidate_cost(placements: &[PlacedExam], config: &ScheduleConfig) -> f64 {
    let mut cost = 0.0;
    let min_s = config.min_students();
    let max_s = config.max_students();

    // Group-size bounds and the occupancy spread.
    let mut group_sizes: Vec<f64> = Vec::with_capacity(placements.len());
    for p in placements {
        let n = p.student_ids.len() as u32;
        if min_s.is_some_and(|min| n < min) {
            cost += MIN_BREACH_WEIGHT;
        }
        if max_s.is_some_and(|max| n > max) {
            cost += MAX_BREACH_WEIGHT;
        }
        group_sizes.push(f64::from(n));
    }
    if group_sizes.len() > 1 {
        let mean = group_sizes.iter().sum::<f64>() / group_sizes.len() as f64;
        let variance = group_sizes
            .iter()
            .map(|x| (x - mean) * (x - mean))
            .sum::<f64>()
            / group_sizes.len() as f64;
        cost += variance.sqrt();
    }

    // Overlap scans. Ordered maps keep the accumulation order independent of
    // hash state, so identical candidates always price identically.
    type Span = (NaiveDateTime, NaiveDateTime);
    let mut room_busy: BTreeMap<(&str, NaiveDate), Vec<Span>> = BTreeMap::new();
    let mut student_busy: BTreeMap<&str, Vec<Span>> = BTreeMap::new();
    let mut exams_per_day: BTreeMap<&str, BTreeMap<NaiveDate, u32>> = BTreeMap::new();

    for p in placements {
        let (start, end) = (p.start_dt(), p.end_dt());

        let in_room = room_busy.entry((p.room.as_str(), p.date)).or_default();
        for &(s, e) in in_room.iter() {
            if start < e && end > s {
                cost += ROOM_OVERLAP_WEIGHT;
            }
        }
        in_room.push((start, end));

        for id in &p.student_ids {
            let taken = student_busy.entry(id.as_str()).or_default();
            for &(s, e) in taken.iter() {
                if start < e && end > s {
                    cost += STUDENT_CLASH_WEIGHT;
                }
            }
            taken.push((start, end));

            *exams_per_day
                .entry(id.as_str())
                .or_default()
                .entry(p.date)
                .or_insert(0) += 1;
        }
    }

    // Day density and same-day gaps.
    for (id, days) in &exams_per_day {
        for (&date, &count) in days {
            if count > MAX_EXAMS_PER_DAY {
                cost += OVERLOAD_BASE_WEIGHT * 2f64.powi((count - MAX_EXAMS_PER_DAY) as i32);
            }
            if count > 1 {
                let mut today: Vec<Span> = student_busy[id]
                    .iter()
                    .filter(|(s, _)| s.date() == date)
                    .copied()
                    .collect();
                today.sort();
                let first_end = today[0].1;
                let last_start = today[today.len() - 1].0;
                let gap = (last_start - first_end).num_minutes() as f64;
                if gap > GAP_TOLERANCE_MINUTES {
                    cost += gap / 60.0;
                }
            }
        }
    }

    cost
}
