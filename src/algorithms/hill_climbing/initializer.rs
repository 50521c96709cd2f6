//! Greedy constructor for one candidate timetable.
//!
//! Subjects are visited in a shuffled order and dropped into the earliest
//! viable (date, shift, rooms) slot. Dates are tried least-loaded first so
//! student-days fill evenly; within a shift, rooms open in configuration
//! order from their next-free time. A subject that fits nowhere becomes a
//! warning, not an error.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::algorithms::error::InitializerError;
use crate::config::{ScheduleConfig, ShiftWindow};
use crate::roster::grouping::split_into_groups;
use crate::roster::Subject;
use crate::solution::PlacedExam;
use crate::Id;

/// Builds one candidate by greedy placement.
///
/// Returns the placements plus the warnings for subjects that fit nowhere.
/// Fails only when placement reaches a shift that has no configured window.
pub fn build_candidate<R: Rng>(
    config: &ScheduleConfig,
    subjects: &[Subject],
    dates: &[NaiveDate],
    rng: &mut R,
) -> Result<(Vec<PlacedExam>, Vec<String>), InitializerError> {
    let mut order: Vec<Subject> = subjects.to_vec();
    order.shuffle(rng);

    let windows: Vec<Option<ShiftWindow>> =
        config.shifts.iter().map(|s| config.window(s)).collect();

    // next_free[room][date][shift]: earliest start still open in that slot.
    // None marks a shift with no window; placement errors before reading it.
    let seed_row: Vec<Option<NaiveTime>> = windows.iter().map(|w| w.map(|w| w.start)).collect();
    let mut next_free: Vec<Vec<Vec<Option<NaiveTime>>>> =
        vec![vec![seed_row; dates.len()]; config.rooms.len()];

    // Students already scheduled per day, for soft day balancing.
    let mut date_load: Vec<u64> = vec![0; dates.len()];
    // Committed exam intervals per student, for the strict clash check.
    let mut busy: HashMap<Id, Vec<(NaiveDateTime, NaiveDateTime)>> = HashMap::new();

    let mut placements: Vec<PlacedExam> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for subject in &order {
        let duration = Duration::minutes(i64::from(subject.duration_minutes));
        let n = subject.student_ids.len();

        // Least-loaded dates first; the stable sort keeps ties chronological.
        let mut date_order: Vec<usize> = (0..dates.len()).collect();
        date_order.sort_by_key(|&i| date_load[i]);

        let mut placed = false;
        'slots: for &di in &date_order {
            let date = dates[di];
            for (si, shift) in config.shifts.iter().enumerate() {
                let window = windows[si]
                    .ok_or_else(|| InitializerError::MissingShiftWindow(shift.clone()))?;
                let window_end = date.and_time(window.end);

                // Rooms whose remaining window still fits this duration.
                let mut open: Vec<(usize, NaiveDateTime, NaiveDateTime)> = Vec::new();
                for ri in 0..config.rooms.len() {
                    let Some(from) = next_free[ri][di][si] else {
                        continue;
                    };
                    let start = date.and_time(from);
                    let end = start + duration;
                    if end <= window_end {
                        open.push((ri, start, end));
                    }
                }
                if open.is_empty() {
                    continue;
                }

                let Some(target) = target_rooms(n, open.len(), config) else {
                    continue;
                };
                let groups = split_into_groups(&subject.student_ids, target);

                // Strict clash check: any overlap between a tentative group
                // interval and a student's committed exams rejects the whole
                // (date, shift) attempt.
                let clashes = groups.iter().zip(&open).any(|(group, &(_, start, end))| {
                    group.iter().any(|id| {
                        busy.get(id)
                            .is_some_and(|iv| iv.iter().any(|&(s, e)| start < e && end > s))
                    })
                });
                if clashes {
                    continue;
                }

                for (group, &(ri, start, end)) in groups.iter().zip(&open) {
                    if group.is_empty() {
                        continue;
                    }
                    placements.push(PlacedExam {
                        date,
                        shift: shift.clone(),
                        start: start.time(),
                        end: end.time(),
                        room: config.rooms[ri].name.clone(),
                        subject: subject.name.clone(),
                        duration_minutes: subject.duration_minutes,
                        student_ids: group.clone(),
                    });
                    let reopen = end + Duration::minutes(i64::from(config.break_minutes));
                    next_free[ri][di][si] = Some(reopen.time());
                    date_load[di] += group.len() as u64;
                    for id in group {
                        busy.entry(id.clone()).or_default().push((start, end));
                    }
                }
                placed = true;
                break 'slots;
            }
        }

        if !placed {
            let msg = format!("cannot schedule subject {} ({} students)", subject.name, n);
            warn!("{msg}");
            warnings.push(msg);
        }
    }

    Ok((placements, warnings))
}

/// Decides how many rooms to split a cohort of `n` across, given `available`
/// open rooms this shift. `None` means the (date, shift) cannot host the
/// subject at all.
fn target_rooms(n: usize, available: usize, config: &ScheduleConfig) -> Option<usize> {
    match (config.min_students(), config.max_students()) {
        (Some(min_s), Some(max_s)) if min_s <= max_s => {
            let (min_s, max_s) = (min_s as usize, max_s as usize);
            if n < min_s {
                // The minimum is unsatisfiable for this cohort; keep it whole
                // rather than orphan the subject.
                return Some(1);
            }
            let min_rooms = n.div_ceil(max_s);
            let max_rooms = n / min_s;
            let upper = max_rooms.min(available);
            if upper >= min_rooms && upper > 0 {
                Some(upper)
            } else if min_rooms <= available {
                // Satisfy the max bound, relax the min.
                Some(min_rooms)
            } else {
                None
            }
        }
        (_, Some(max_s)) => {
            let required = n.div_ceil(max_s as usize);
            if required > available {
                None
            } else {
                // Enough rooms to respect the max; spread across all of them.
                Some(available)
            }
        }
        _ => Some(available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::Room;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn one_shift_config(rooms: usize, break_minutes: u32) -> ScheduleConfig {
        let mut cfg = ScheduleConfig {
            shifts: vec!["Morning".to_string()],
            break_minutes,
            rooms: (1..=rooms).map(|i| Room::new(format!("Phòng {i}"))).collect(),
            ..ScheduleConfig::default()
        };
        cfg.shift_times.clear();
        cfg.shift_times.insert(
            "Morning".to_string(),
            ShiftWindow::new(t(8, 0), t(12, 0)),
        );
        cfg
    }

    fn subject(name: &str, duration: u32, ids: &[&str]) -> Subject {
        Subject {
            name: name.to_string(),
            duration_minutes: duration,
            student_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn single_subject_starts_at_window_open() {
        let cfg = one_shift_config(1, 10);
        let subjects = vec![subject("Math", 60, &["s1", "s2", "s3"])];
        let (placements, warnings) =
            build_candidate(&cfg, &subjects, &[d(3), d(4)], &mut rng()).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(placements.len(), 1);
        let p = &placements[0];
        assert_eq!(p.start, t(8, 0));
        assert_eq!(p.end, t(9, 0));
        assert_eq!(p.student_ids, vec!["s1", "s2", "s3"]);
        assert_eq!(p.room, "Phòng 1");
    }

    #[test]
    fn same_room_placements_respect_break() {
        let cfg = one_shift_config(1, 10);
        let subjects = vec![
            subject("Math", 60, &["s1", "s2"]),
            subject("Physics", 60, &["s1", "s2"]),
        ];
        let (placements, warnings) =
            build_candidate(&cfg, &subjects, &[d(3)], &mut rng()).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(placements.len(), 2);
        let mut times: Vec<(NaiveTime, NaiveTime)> =
            placements.iter().map(|p| (p.start, p.end)).collect();
        times.sort();
        assert_eq!(times, vec![(t(8, 0), t(9, 0)), (t(9, 10), t(10, 10))]);
    }

    #[test]
    fn cohort_split_by_max_bound() {
        let ids: Vec<String> = (1..=10).map(|i| format!("s{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let cfg = ScheduleConfig {
            max_students_per_room: Some(5),
            ..one_shift_config(2, 10)
        };
        let subjects = vec![subject("Math", 60, &id_refs)];
        let (placements, warnings) =
            build_candidate(&cfg, &subjects, &[d(3)], &mut rng()).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(placements.len(), 2);
        assert!(placements.iter().all(|p| p.start == t(8, 0)));
        assert!(placements.iter().all(|p| p.student_ids.len() == 5));
        // order-preserving split
        assert_eq!(placements[0].student_ids[0], "s1");
        assert_eq!(placements[1].student_ids[0], "s6");
    }

    #[test]
    fn oversized_subject_becomes_warning() {
        let mut cfg = one_shift_config(1, 0);
        cfg.shift_times.insert(
            "Morning".to_string(),
            ShiftWindow::new(t(8, 0), t(10, 0)),
        );
        let subjects = vec![subject("Marathon", 300, &["s1", "s2"])];
        let (placements, warnings) =
            build_candidate(&cfg, &subjects, &[d(3)], &mut rng()).unwrap();

        assert!(placements.is_empty());
        assert_eq!(
            warnings,
            vec!["cannot schedule subject Marathon (2 students)".to_string()]
        );
    }

    #[test]
    fn missing_window_fails_construction() {
        let mut cfg = one_shift_config(1, 0);
        cfg.shifts.push("Evening".to_string());
        // Morning too short, so placement reaches Evening.
        cfg.shift_times.insert(
            "Morning".to_string(),
            ShiftWindow::new(t(8, 0), t(9, 0)),
        );
        let subjects = vec![subject("Math", 120, &["s1"])];
        let err = build_candidate(&cfg, &subjects, &[d(3)], &mut rng()).unwrap_err();
        assert_eq!(err, InitializerError::MissingShiftWindow("Evening".to_string()));
    }

    #[test]
    fn shared_student_never_double_booked() {
        // Three one-student subjects in two rooms: without the clash check
        // the spare room would tempt parallel placement.
        let cfg = one_shift_config(2, 0);
        let subjects = vec![
            subject("Math", 60, &["s1"]),
            subject("Physics", 60, &["s1"]),
            subject("Chemistry", 60, &["s1"]),
        ];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (placements, warnings) =
                build_candidate(&cfg, &subjects, &[d(3)], &mut rng).unwrap();
            assert!(warnings.is_empty(), "seed {seed}");
            assert_eq!(placements.len(), 3, "seed {seed}");
            for a in 0..placements.len() {
                for b in a + 1..placements.len() {
                    assert!(
                        !placements[a].overlaps(&placements[b]),
                        "seed {seed}: {a} and {b} overlap"
                    );
                }
            }
        }
    }

    #[test]
    fn clash_pushes_subject_to_next_shift() {
        // Room 1 runs out of window, room 2 is free but its slot would
        // overlap s1's first exam, so the second subject moves shifts.
        let mut cfg = ScheduleConfig {
            shifts: vec!["Morning".to_string(), "Afternoon".to_string()],
            break_minutes: 0,
            rooms: vec![Room::new("Phòng 1"), Room::new("Phòng 2")],
            ..ScheduleConfig::default()
        };
        cfg.shift_times.clear();
        cfg.shift_times.insert(
            "Morning".to_string(),
            ShiftWindow::new(t(8, 0), t(11, 0)),
        );
        cfg.shift_times.insert(
            "Afternoon".to_string(),
            ShiftWindow::new(t(13, 0), t(17, 0)),
        );
        let subjects = vec![
            subject("Long", 120, &["s1"]),
            subject("Short", 90, &["s1"]),
        ];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (placements, warnings) =
                build_candidate(&cfg, &subjects, &[d(3)], &mut rng).unwrap();
            assert!(warnings.is_empty(), "seed {seed}");
            assert_eq!(placements.len(), 2, "seed {seed}");
            assert!(!placements[0].overlaps(&placements[1]), "seed {seed}");
            let shifts: HashSet<&str> =
                placements.iter().map(|p| p.shift.as_str()).collect();
            assert_eq!(shifts.len(), 2, "seed {seed}: expected both shifts used");
        }
    }

    #[test]
    fn dates_fill_least_loaded_first() {
        let cfg = one_shift_config(1, 0);
        let subjects = vec![
            subject("A", 60, &["s1", "s2", "s3"]),
            subject("B", 60, &["s4"]),
        ];
        let (placements, _) = build_candidate(&cfg, &subjects, &[d(3), d(4)], &mut rng()).unwrap();
        assert_eq!(placements.len(), 2);
        // whichever subject goes first, the second lands on the other day
        assert_ne!(placements[0].date, placements[1].date);
    }

    // ── target_rooms ──────────────────────────────────────────────────

    fn bounds(min: Option<u32>, max: Option<u32>) -> ScheduleConfig {
        ScheduleConfig {
            min_students_per_room: min,
            max_students_per_room: max,
            ..ScheduleConfig::default()
        }
    }

    #[test]
    fn unconstrained_uses_all_available_rooms() {
        assert_eq!(target_rooms(10, 3, &bounds(None, None)), Some(3));
    }

    #[test]
    fn max_only_requires_enough_rooms() {
        // 10 students at max 4 need 3 rooms
        assert_eq!(target_rooms(10, 2, &bounds(None, Some(4))), None);
        assert_eq!(target_rooms(10, 3, &bounds(None, Some(4))), Some(3));
        // with spare rooms, spread across all of them
        assert_eq!(target_rooms(10, 5, &bounds(None, Some(4))), Some(5));
    }

    #[test]
    fn min_and_max_prefer_the_widest_feasible_split() {
        // 12 students, min 3, max 6: feasible splits are 2..4 rooms
        assert_eq!(target_rooms(12, 4, &bounds(Some(3), Some(6))), Some(4));
        assert_eq!(target_rooms(12, 3, &bounds(Some(3), Some(6))), Some(3));
        assert_eq!(target_rooms(12, 10, &bounds(Some(3), Some(6))), Some(4));
    }

    #[test]
    fn min_relaxed_when_rooms_are_scarce() {
        // 20 students, min 9, max 10: floor(20/9) = 2 rooms wanted, but with
        // ceil(20/10) = 2 <= 1 failing, the max bound still needs 2 rooms.
        assert_eq!(target_rooms(20, 1, &bounds(Some(9), Some(10))), None);
        // 7 students, min 4, max 5: max_rooms = 1 < min_rooms = 2; fall back
        // to min_rooms when enough rooms exist.
        assert_eq!(target_rooms(7, 2, &bounds(Some(4), Some(5))), Some(2));
    }

    #[test]
    fn tiny_cohort_stays_whole() {
        assert_eq!(target_rooms(2, 3, &bounds(Some(5), Some(10))), Some(1));
    }

    #[test]
    fn inverted_bounds_fall_back_to_max_only() {
        // min 10 > max 5 is treated as max-only
        assert_eq!(target_rooms(10, 3, &bounds(Some(10), Some(5))), Some(3));
        assert_eq!(target_rooms(10, 1, &bounds(Some(10), Some(5))), None);
    }
}
