//! Student records and the per-subject index derived from them.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::Id;

pub mod grouping;

/// One student record: stable id, display name, and the exams they sit
/// (subject name mapped to duration in minutes).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Student {
    pub student_id: Id,
    pub name: String,
    pub subjects: BTreeMap<String, u32>,
}

impl Student {
    pub fn new(student_id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            subjects: BTreeMap::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>, duration_minutes: u32) -> Self {
        self.subjects.insert(subject.into(), duration_minutes);
        self
    }
}

/// Read-only id -> display-name side table used when formatting results.
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    names: HashMap<Id, String>,
}

impl StudentDirectory {
    pub fn from_students(students: &[Student]) -> Self {
        Self {
            names: students
                .iter()
                .map(|s| (s.student_id.clone(), s.name.clone()))
                .collect(),
        }
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }
}

/// A subject to examine: derived once from the roster, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub name: String,
    pub duration_minutes: u32,
    /// Enrolled students, first-seen roster order, no duplicates.
    pub student_ids: Vec<Id>,
}

/// Aggregates the roster into subjects with consistent durations.
///
/// The first duration observed for a subject name wins; later records that
/// disagree produce a warning instead of rewriting it. Subjects come out
/// sorted by name so downstream consumers see a deterministic order (the
/// initializer shuffles its own private copy).
#[derive(Debug, Clone)]
pub struct SubjectIndex {
    subjects: Vec<Subject>,
    warnings: Vec<String>,
}

impl SubjectIndex {
    pub fn build(students: &[Student]) -> Self {
        let mut by_name: BTreeMap<String, Subject> = BTreeMap::new();
        let mut seen: HashMap<String, HashSet<Id>> = HashMap::new();
        let mut warnings = Vec::new();

        for student in students {
            for (name, &duration) in &student.subjects {
                let entry = by_name.entry(name.clone()).or_insert_with(|| Subject {
                    name: name.clone(),
                    duration_minutes: duration,
                    student_ids: Vec::new(),
                });
                if entry.duration_minutes != duration {
                    warnings.push(format!(
                        "duration mismatch for subject {}: keeping {} min, ignoring {} min (student {})",
                        name, entry.duration_minutes, duration, student.student_id
                    ));
                }
                if seen
                    .entry(name.clone())
                    .or_default()
                    .insert(student.student_id.clone())
                {
                    entry.student_ids.push(student.student_id.clone());
                }
            }
        }

        Self {
            subjects: by_name.into_values().collect(),
            warnings,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
