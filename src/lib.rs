//! examplan - exam timetabling by greedy construction and hill climbing
//!
//! A library that assigns (subject, student group, room, date, shift, time)
//! tuples so that no student sits two exams at once, rooms never double-book,
//! and soft penalties (day load, gaps, room balance) are minimized by a
//! restart-based local search.

pub mod algorithms;
pub mod calendar;
pub mod config;
#[cfg(feature = "serde")]
pub mod ingest;
pub mod report;
pub mod roster;
pub mod rooms;
pub mod solution;

// Re-export the main entry points for ergonomic use
pub use algorithms::hill_climbing::HillClimbingScheduler;
pub use algorithms::SchedulingAlgorithm;

/// Identifier type used for students and scheduling artifacts.
pub type Id = String;
