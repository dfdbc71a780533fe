//! Workout overview: the headline card of lifetime-or-window totals,
//! consistency, and training-habit callouts.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::db::DbPool;
use crate::error::Result;
use crate::facts::{self, SessionFact, SetFact};
use crate::filter::TimeFilter;
use crate::formulas;

/// ---------------------------------------------------------------------------
/// Response Contract
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutOverview {
  /// Completed workouts in the window.
  pub total_workouts: i64,
  /// Total active training time, minutes.
  pub total_duration: i64,
  pub total_volume: f64,
  /// Mean active duration per completed workout, minutes.
  pub avg_workout_duration: i64,
  pub most_trained_muscle: String,
  /// 0..=100, see `formulas::workout_consistency`.
  pub workout_consistency: f64,
  /// Completion time of the latest-started workout, if it was completed.
  pub most_recent_workout: Option<DateTime<Utc>>,
  /// Weekday name with the most workout starts.
  pub busiest_day: Option<String>,
  /// Morning / Afternoon / Evening / Night.
  pub busiest_time: Option<String>,
}

impl Default for WorkoutOverview {
  fn default() -> Self {
    Self {
      total_workouts: 0,
      total_duration: 0,
      total_volume: 0.0,
      avg_workout_duration: 0,
      most_trained_muscle: "None".to_string(),
      workout_consistency: 0.0,
      most_recent_workout: None,
      busiest_day: None,
      busiest_time: None,
    }
  }
}

impl WorkoutOverview {
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Summary statistics across the user's workouts in the window.
pub async fn workout_overview(
  pool: &DbPool,
  user_id: i64,
  filter: &TimeFilter,
  config: &StatsConfig,
) -> Result<WorkoutOverview> {
  let range = filter.resolve(Utc::now());

  let sessions = facts::load_sessions(pool, user_id, &range).await?;
  let set_facts = facts::load_set_facts(pool, user_id, &range, None).await?;

  Ok(compute_overview(&sessions, &set_facts, config))
}

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

fn time_of_day(hour: u32) -> &'static str {
  match hour {
    5..=11 => "Morning",
    12..=16 => "Afternoon",
    17..=21 => "Evening",
    _ => "Night",
  }
}

/// Pure core over loaded facts.
pub fn compute_overview(
  sessions: &[SessionFact],
  set_facts: &[SetFact],
  config: &StatsConfig,
) -> WorkoutOverview {
  if sessions.is_empty() {
    return WorkoutOverview::default();
  }

  let completed: Vec<&SessionFact> =
    sessions.iter().filter(|s| s.completed_at.is_some()).collect();
  if completed.is_empty() {
    return WorkoutOverview::default();
  }

  let total_workouts = completed.len() as i64;

  // Durations in whole minutes; the average divides the raw seconds so two
  // roundings never stack.
  let total_seconds: i64 = completed.iter().filter_map(|s| s.active_duration).sum();
  let total_duration = (total_seconds as f64 / 60.0).round() as i64;
  let avg_workout_duration =
    (total_seconds as f64 / total_workouts as f64 / 60.0).round() as i64;

  // Volume over every set in the window, warmups included. In-progress
  // sessions contribute unless configured out.
  let total_volume: f64 = set_facts
    .iter()
    .filter(|s| config.count_in_progress_volume || s.session_completed())
    .filter_map(|s| s.volume())
    .sum();
  let total_volume = round1(total_volume);

  let mut muscle_volume: BTreeMap<&str, f64> = BTreeMap::new();
  for set in set_facts {
    if let Some(volume) = set.volume() {
      *muscle_volume.entry(set.muscle_group.as_str()).or_insert(0.0) += volume;
    }
  }
  let most_trained_muscle = muscle_volume
    .iter()
    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
    .map(|(muscle, _)| muscle.to_string())
    .unwrap_or_else(|| "None".to_string());

  let completed_starts: Vec<DateTime<Utc>> =
    completed.iter().filter_map(|s| s.started_at).collect();
  let workout_consistency = round1(formulas::workout_consistency(&completed_starts));

  // The latest-started session overall; unfinished means no completion time.
  let most_recent_workout = sessions
    .iter()
    .max_by_key(|s| s.started_at.unwrap_or(DateTime::<Utc>::MIN_UTC))
    .and_then(|s| s.completed_at);

  // Habit callouts run over every session with a start time, finished or not.
  let mut day_counts: BTreeMap<String, i64> = BTreeMap::new();
  let mut time_counts: BTreeMap<&'static str, i64> = BTreeMap::new();
  for started in sessions.iter().filter_map(|s| s.started_at) {
    *day_counts.entry(started.format("%A").to_string()).or_insert(0) += 1;
    *time_counts.entry(time_of_day(started.hour())).or_insert(0) += 1;
  }
  let busiest_day = day_counts
    .iter()
    .max_by_key(|(_, count)| **count)
    .map(|(day, _)| day.clone());
  let busiest_time = time_counts
    .iter()
    .max_by_key(|(_, count)| **count)
    .map(|(slot, _)| slot.to_string());

  WorkoutOverview {
    total_workouts,
    total_duration,
    total_volume,
    avg_workout_duration,
    most_trained_muscle,
    workout_consistency,
    most_recent_workout,
    busiest_day,
    busiest_time,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
