//! Muscle-group activity: volume, set counts, recovery, and the normalized
//! activity levels behind the heatmap view. Completed sessions only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::db::DbPool;
use crate::error::Result;
use crate::facts::{self, SessionFact, SetFact};
use crate::filter::TimeFilter;
use crate::formulas;

/// ---------------------------------------------------------------------------
/// Response Contracts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuscleGroupActivity {
  pub muscle_group: String,
  pub volume: f64,
  pub sets_count: i64,
  /// Volume normalized against the busiest group in the window, 0..=1.
  pub activity_level: f64,
  pub last_trained: Option<DateTime<Utc>>,
  /// 0..=100, omitted when the group was never trained in the window.
  pub recovery_status: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuscleGroupStats {
  /// Actual bounds of the contributing sessions, not the filter's nominal
  /// window. Both default to the query instant when nothing qualified.
  pub date_range_start: DateTime<Utc>,
  pub date_range_end: DateTime<Utc>,
  pub muscle_groups: Vec<MuscleGroupActivity>,
}

impl MuscleGroupStats {
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Training volume and activity by target muscle group within the window.
pub async fn muscle_group_activity(
  pool: &DbPool,
  user_id: i64,
  filter: &TimeFilter,
  config: &StatsConfig,
) -> Result<MuscleGroupStats> {
  let now = Utc::now();
  let range = filter.resolve(now);

  let sessions = facts::load_sessions(pool, user_id, &range).await?;
  let set_facts = facts::load_set_facts(pool, user_id, &range, None).await?;

  Ok(compute_muscle_groups(&sessions, &set_facts, now, config))
}

#[derive(Default)]
struct GroupAccumulator {
  volume: f64,
  sets_count: i64,
  last_trained: Option<DateTime<Utc>>,
}

/// Pure core over loaded facts.
pub fn compute_muscle_groups(
  sessions: &[SessionFact],
  set_facts: &[SetFact],
  now: DateTime<Utc>,
  config: &StatsConfig,
) -> MuscleGroupStats {
  let completed: Vec<&SessionFact> =
    sessions.iter().filter(|s| s.completed_at.is_some()).collect();

  if completed.is_empty() {
    return MuscleGroupStats {
      date_range_start: now,
      date_range_end: now,
      muscle_groups: Vec::new(),
    };
  }

  let mut groups: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();

  for set in set_facts.iter().filter(|s| s.session_completed()) {
    let acc = groups.entry(set.muscle_group.as_str()).or_default();

    if let Some(completed_at) = set.session_completed_at {
      if acc.last_trained.map_or(true, |lt| completed_at > lt) {
        acc.last_trained = Some(completed_at);
      }
    }

    let volume = set.volume();
    acc.volume += volume.unwrap_or(0.0);

    let counts = if config.count_only_volume_sets {
      volume.is_some()
    } else {
      set.reps_completed.is_some()
    };
    if counts {
      acc.sets_count += 1;
    }
  }

  let max_volume = groups.values().map(|g| g.volume).fold(0.0_f64, f64::max);

  // Nothing lifted anything: no activity entries at all rather than a list of
  // zero levels.
  let muscle_groups = if max_volume > 0.0 {
    let mut entries: Vec<MuscleGroupActivity> = groups
      .into_iter()
      .map(|(muscle_group, acc)| MuscleGroupActivity {
        muscle_group: muscle_group.to_string(),
        volume: acc.volume,
        sets_count: acc.sets_count,
        activity_level: acc.volume / max_volume,
        last_trained: acc.last_trained,
        recovery_status: acc.last_trained.map(|lt| formulas::recovery_status(lt, now)),
      })
      .collect();

    // Busiest first; equal levels keep their alphabetical map order.
    entries.sort_by(|a, b| {
      b.activity_level
        .partial_cmp(&a.activity_level)
        .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
  } else {
    Vec::new()
  };

  let date_range_start = completed
    .iter()
    .filter_map(|s| s.started_at)
    .min()
    .unwrap_or(now);
  let date_range_end = completed
    .iter()
    .filter_map(|s| s.completed_at)
    .max()
    .unwrap_or(now);

  MuscleGroupStats { date_range_start, date_range_end, muscle_groups }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
