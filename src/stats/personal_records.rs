//! Personal records: the heaviest completed set per (exercise, rep count),
//! ranked by estimated one-rep max and paginated.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::error::Result;
use crate::facts::{self, SetFact};
use crate::filter::TimeFilter;
use crate::formulas;

/// ---------------------------------------------------------------------------
/// Response Contracts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
  pub exercise_id: i64,
  pub exercise_name: String,
  pub target_muscle_group: String,
  pub weight: f64,
  pub reps: i64,
  /// Completion time of the session the record was set in.
  pub date: DateTime<Utc>,
  pub estimated_one_rep_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecordsPage {
  pub records: Vec<PersonalRecord>,
  /// Record count before pagination.
  pub total_count: i64,
}

impl PersonalRecordsPage {
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Personal records across all exercises in the window, strongest first.
/// `page` is zero-based; `limit` caps the page size.
pub async fn personal_records(
  pool: &DbPool,
  user_id: i64,
  filter: &TimeFilter,
  page: usize,
  limit: usize,
) -> Result<PersonalRecordsPage> {
  let range = filter.resolve(Utc::now());
  let set_facts = facts::load_set_facts(pool, user_id, &range, None).await?;

  Ok(compute_records(&set_facts, page, limit))
}

/// Pure core over loaded facts.
pub fn compute_records(set_facts: &[SetFact], page: usize, limit: usize) -> PersonalRecordsPage {
  // Best candidate per (exercise, rep count). A later set must be strictly
  // heavier to displace the incumbent.
  let mut best: BTreeMap<(i64, i64), &SetFact> = BTreeMap::new();

  for set in set_facts.iter().filter(|s| !s.is_warmup) {
    let (weight, reps) = match (set.weight, set.reps_completed) {
      (Some(w), Some(r)) => (w, r),
      _ => continue,
    };
    best
      .entry((set.exercise_id, reps))
      .and_modify(|current| {
        if current.weight.map_or(true, |cw| weight > cw) {
          *current = set;
        }
      })
      .or_insert(set);
  }

  // A record only stands once its session was completed; candidates from
  // in-progress sessions drop out after selection rather than yielding to a
  // lighter completed set.
  let mut records: Vec<PersonalRecord> = best
    .into_values()
    .filter_map(|set| {
      let date = set.session_completed_at?;
      let weight = set.weight?;
      let reps = set.reps_completed?;
      Some(PersonalRecord {
        exercise_id: set.exercise_id,
        exercise_name: set.exercise_name.clone(),
        target_muscle_group: set.muscle_group.clone(),
        weight,
        reps,
        date,
        estimated_one_rep_max: formulas::estimate_one_rep_max(weight, reps),
      })
    })
    .collect();

  // Strongest first by estimated one-rep max; inestimable records sink to the
  // bottom. The sort is stable so map order breaks ties.
  records.sort_by(|a, b| {
    let a_orm = a.estimated_one_rep_max.unwrap_or(0.0);
    let b_orm = b.estimated_one_rep_max.unwrap_or(0.0);
    b_orm.partial_cmp(&a_orm).unwrap_or(Ordering::Equal)
  });

  let total_count = records.len() as i64;
  let start = page.saturating_mul(limit).min(records.len());
  let end = start.saturating_add(limit).min(records.len());
  let records = records[start..end].to_vec();

  PersonalRecordsPage { records, total_count }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
