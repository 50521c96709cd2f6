//! JSON ingestion for rosters and raw configurations.
//!
//! Upstream data arrives in loosely shaped JSON: the roster may be a bare
//! array or wrapped in a `students` object, and each student's subjects may
//! be a name-to-minutes map or a list of objects with varying key names.
//! This module normalizes those shapes into the core types; it is the only
//! boundary that deals in `"HH:MM"` strings.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{ScheduleConfig, ShiftWindow};
use crate::rooms::Room;
use crate::roster::Student;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unparseable time {value:?} for shift {shift}: expected HH:MM")]
    BadShiftTime { shift: String, value: String },
}

/// Parses a roster from JSON.
///
/// Accepts a top-level array of student objects or an object carrying a
/// `students` array. Subject entries missing a usable name or duration are
/// skipped; non-object records are skipped whole.
pub fn parse_students(input: &str) -> Result<Vec<Student>, IngestError> {
    let value: Value = serde_json::from_str(input)?;
    let empty = Vec::new();
    let records = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("students")
            .and_then(Value::as_array)
            .unwrap_or(&empty),
        _ => &empty,
    };
    Ok(records.iter().filter_map(student_from_value).collect())
}

fn student_from_value(value: &Value) -> Option<Student> {
    let record = value.as_object()?;
    let student_id = match record.get("student_id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut subjects = BTreeMap::new();
    match record.get("subjects") {
        Some(Value::Object(map)) => {
            for (subject, duration) in map {
                if let Some(minutes) = as_minutes(duration) {
                    subjects.insert(subject.clone(), minutes);
                }
            }
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                let Some(entry) = entry.as_object() else {
                    continue;
                };
                let subject = ["name", "subject", "subject_name"]
                    .iter()
                    .find_map(|k| entry.get(*k).and_then(Value::as_str));
                let minutes = ["duration", "time", "minutes"]
                    .iter()
                    .find_map(|k| entry.get(*k).and_then(as_minutes));
                if let (Some(subject), Some(minutes)) = (subject, minutes) {
                    subjects.insert(subject.to_string(), minutes);
                }
            }
        }
        _ => {}
    }

    Some(Student {
        student_id,
        name,
        subjects,
    })
}

/// Durations arrive as numbers or numeric strings.
fn as_minutes(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|m| u32::try_from(m).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Configuration as it crosses the wire: shift times as `"HH:MM"` strings,
/// every field except the horizon defaulted like the upstream form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScheduleConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_off_days")]
    pub off_days: Vec<u8>,
    #[serde(default = "default_shifts")]
    pub shifts: Vec<String>,
    #[serde(default = "default_shift_times")]
    pub shift_times: HashMap<String, RawShiftWindow>,
    #[serde(default = "default_break_time")]
    pub break_time: u32,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub min_students_per_room: Option<u32>,
    #[serde(default)]
    pub max_students_per_room: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawShiftWindow {
    pub start: String,
    pub end: String,
}

impl RawScheduleConfig {
    /// Converts the wire form into a [`ScheduleConfig`], parsing the
    /// `"HH:MM"` window bounds.
    pub fn into_config(self) -> Result<ScheduleConfig, IngestError> {
        let mut shift_times = HashMap::new();
        for (shift, raw) in self.shift_times {
            let start = parse_hm(&shift, &raw.start)?;
            let end = parse_hm(&shift, &raw.end)?;
            shift_times.insert(shift, ShiftWindow::new(start, end));
        }
        Ok(ScheduleConfig {
            start_date: self.start_date,
            end_date: self.end_date,
            off_days: self.off_days.into_iter().collect(),
            shifts: self.shifts,
            shift_times,
            break_minutes: self.break_time,
            rooms: self.rooms,
            min_students_per_room: self.min_students_per_room,
            max_students_per_room: self.max_students_per_room,
        })
    }
}

/// Parses a raw configuration document and converts it in one step.
pub fn parse_config(input: &str) -> Result<ScheduleConfig, IngestError> {
    let raw: RawScheduleConfig = serde_json::from_str(input)?;
    raw.into_config()
}

fn parse_hm(shift: &str, value: &str) -> Result<NaiveTime, IngestError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| IngestError::BadShiftTime {
        shift: shift.to_string(),
        value: value.to_string(),
    })
}

fn default_off_days() -> Vec<u8> {
    vec![5, 6]
}

fn default_shifts() -> Vec<String> {
    vec!["Morning".to_string(), "Afternoon".to_string()]
}

fn default_shift_times() -> HashMap<String, RawShiftWindow> {
    HashMap::from([
        (
            "Morning".to_string(),
            RawShiftWindow {
                start: "07:30".to_string(),
                end: "11:30".to_string(),
            },
        ),
        (
            "Afternoon".to_string(),
            RawShiftWindow {
                start: "13:30".to_string(),
                end: "17:30".to_string(),
            },
        ),
    ])
}

fn default_break_time() -> u32 {
    30
}
