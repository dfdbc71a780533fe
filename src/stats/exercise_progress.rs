//! Per-exercise progress: personal record, estimated one-rep max, and the
//! volume / max-weight series that back the progress charts.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::error::{Result, StatsError};
use crate::facts::{self, ExerciseRef, SetFact};
use crate::filter::TimeFilter;
use crate::formulas;

/// ---------------------------------------------------------------------------
/// Response Contracts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSetRecord {
  pub date: DateTime<Utc>,
  pub weight: f64,
  pub reps: i64,
  pub is_personal_record: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumePoint {
  pub date: DateTime<Utc>,
  pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxWeightPoint {
  pub date: DateTime<Utc>,
  pub weight: f64,
  pub reps: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseProgress {
  pub exercise_id: i64,
  pub exercise_name: String,
  pub target_muscle_group: String,
  pub personal_record_weight: Option<f64>,
  pub personal_record_reps: Option<i64>,
  pub personal_record_date: Option<DateTime<Utc>>,
  pub one_rep_max_estimated: Option<f64>,
  pub recent_sets: Vec<ExerciseSetRecord>,
  pub volume_over_time: Vec<VolumePoint>,
  pub max_weight_over_time: Vec<MaxWeightPoint>,
}

impl ExerciseProgress {
  fn empty(exercise: &ExerciseRef) -> Self {
    Self {
      exercise_id: exercise.id,
      exercise_name: exercise.name.clone(),
      target_muscle_group: exercise.target_muscle_group.clone(),
      personal_record_weight: None,
      personal_record_reps: None,
      personal_record_date: None,
      one_rep_max_estimated: None,
      recent_sets: Vec::new(),
      volume_over_time: Vec::new(),
      max_weight_over_time: Vec::new(),
    }
  }

  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Progress statistics for one exercise within the filter window.
///
/// Fails with `NotFound` when the exercise id is unknown; an empty training
/// history is a valid all-empty result, not an error.
pub async fn exercise_progress(
  pool: &DbPool,
  user_id: i64,
  exercise_id: i64,
  filter: &TimeFilter,
) -> Result<ExerciseProgress> {
  let exercise = facts::find_exercise(pool, exercise_id)
    .await?
    .ok_or(StatsError::NotFound(exercise_id))?;

  let range = filter.resolve(Utc::now());
  let set_facts = facts::load_set_facts(pool, user_id, &range, Some(exercise_id)).await?;

  Ok(compute_progress(&exercise, &set_facts))
}

/// Pure core over loaded facts. Warmup sets never qualify here.
pub fn compute_progress(exercise: &ExerciseRef, set_facts: &[SetFact]) -> ExerciseProgress {
  let working: Vec<&SetFact> = set_facts
    .iter()
    .filter(|s| !s.is_warmup && s.session_started_at.is_some())
    .collect();

  if working.is_empty() {
    return ExerciseProgress::empty(exercise);
  }

  // The heaviest weighted set; its own reps and session date make the record.
  let pr_set = working
    .iter()
    .filter(|s| s.weight.is_some())
    .max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal))
    .copied();

  let one_rep_max_estimated = working
    .iter()
    .filter_map(|s| match (s.weight, s.reps_completed) {
      (Some(w), Some(r)) => formulas::estimate_one_rep_max(w, r),
      _ => None,
    })
    .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    .filter(|orm| *orm > 0.0);

  // Group by session, keyed by (start, id) so equal start times stay stable.
  let mut by_session: BTreeMap<(DateTime<Utc>, i64), Vec<&SetFact>> = BTreeMap::new();
  for &set in &working {
    if let Some(date) = set.session_started_at {
      by_session.entry((date, set.session_id)).or_default().push(set);
    }
  }

  let mut volume_over_time = Vec::new();
  let mut max_weight_over_time = Vec::new();

  for ((date, _), sets) in &by_session {
    let volumes: Vec<f64> = sets.iter().filter_map(|s| s.volume()).collect();
    if !volumes.is_empty() {
      volume_over_time.push(VolumePoint { date: *date, volume: volumes.iter().sum() });
    }

    let heaviest = sets
      .iter()
      .filter(|s| s.weight.is_some())
      .max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));
    if let Some(set) = heaviest {
      if let (Some(weight), Some(reps)) = (set.weight, set.reps_completed) {
        max_weight_over_time.push(MaxWeightPoint { date: *date, weight, reps });
      }
    }
  }

  // The last three sessions, newest first.
  let mut recent_sets = Vec::new();
  for ((date, _), sets) in by_session.iter().rev().take(3) {
    for set in sets {
      if let (Some(weight), Some(reps)) = (set.weight, set.reps_completed) {
        let is_personal_record = pr_set
          .map(|pr| pr.weight == set.weight && pr.reps_completed == set.reps_completed)
          .unwrap_or(false);
        recent_sets.push(ExerciseSetRecord { date: *date, weight, reps, is_personal_record });
      }
    }
  }

  ExerciseProgress {
    exercise_id: exercise.id,
    exercise_name: exercise.name.clone(),
    target_muscle_group: exercise.target_muscle_group.clone(),
    personal_record_weight: pr_set.and_then(|s| s.weight),
    personal_record_reps: pr_set.and_then(|s| s.reps_completed),
    personal_record_date: pr_set.and_then(|s| s.session_started_at),
    one_rep_max_estimated,
    recent_sets,
    volume_over_time,
    max_weight_over_time,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
