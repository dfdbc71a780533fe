//! Workout statistics engine for a weightlifting tracker.
//!
//! Aggregates logged sessions, exercises, and sets into the read models the
//! app's statistics screens consume: per-exercise progress, muscle-group
//! activity, personal records, the workout overview card, and trend series.
//! All queries are scoped to one user and an optional time window.

pub mod config;
pub mod db;
pub mod error;
pub mod facts;
pub mod filter;
pub mod formulas;
pub mod models;
pub mod stats;

#[cfg(test)]
pub mod test_utils;

pub use config::StatsConfig;
pub use db::{connect, DbPool};
pub use error::{Result, StatsError};
pub use filter::{DateRange, Period, TimeFilter};
pub use stats::{
  exercise_progress, muscle_group_activity, personal_records, workout_overview, workout_trends,
  ExerciseProgress, MuscleGroupStats, PersonalRecordsPage, TrendMetric, TrendPeriod,
  WorkoutOverview, WorkoutTrends,
};
