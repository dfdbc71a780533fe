//! Trend series: one metric bucketed over time, ready for charting.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::error::{Result, StatsError};
use crate::facts::{self, SessionFact, SetFact};
use crate::filter::TimeFilter;

/// ---------------------------------------------------------------------------
/// Metric and Period Selectors
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
  Volume,
  /// Active duration, minutes.
  Duration,
  /// Completed workouts per bucket.
  Frequency,
}

impl std::fmt::Display for TrendMetric {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TrendMetric::Volume => write!(f, "volume"),
      TrendMetric::Duration => write!(f, "duration"),
      TrendMetric::Frequency => write!(f, "frequency"),
    }
  }
}

impl std::str::FromStr for TrendMetric {
  type Err = StatsError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "volume" => Ok(TrendMetric::Volume),
      "duration" => Ok(TrendMetric::Duration),
      "frequency" => Ok(TrendMetric::Frequency),
      _ => Err(StatsError::InvalidInput(format!(
        "unknown trend metric '{}', expected volume/duration/frequency",
        s
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
  Daily,
  Weekly,
  Monthly,
}

impl std::fmt::Display for TrendPeriod {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TrendPeriod::Daily => write!(f, "daily"),
      TrendPeriod::Weekly => write!(f, "weekly"),
      TrendPeriod::Monthly => write!(f, "monthly"),
    }
  }
}

impl std::str::FromStr for TrendPeriod {
  type Err = StatsError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "daily" => Ok(TrendPeriod::Daily),
      "weekly" => Ok(TrendPeriod::Weekly),
      "monthly" => Ok(TrendPeriod::Monthly),
      _ => Err(StatsError::InvalidInput(format!(
        "unknown trend period '{}', expected daily/weekly/monthly",
        s
      ))),
    }
  }
}

impl TrendPeriod {
  /// Map a completion date to the first day of its bucket. Weekly buckets
  /// anchor on Monday, monthly on the first of the month.
  fn bucket_of(self, date: NaiveDate) -> NaiveDate {
    match self {
      TrendPeriod::Daily => date,
      TrendPeriod::Weekly => {
        date - Duration::days(date.weekday().num_days_from_monday() as i64)
      }
      TrendPeriod::Monthly => date.with_day(1).unwrap_or(date),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Response Contracts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
  /// Midnight UTC on the bucket's first day.
  pub date: DateTime<Utc>,
  pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTrends {
  pub metric: TrendMetric,
  pub period: TrendPeriod,
  /// Points in ascending date order; empty buckets are absent, not zero.
  pub data: Vec<TrendPoint>,
}

impl WorkoutTrends {
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Time series of one metric over the user's completed workouts, bucketed by
/// completion date.
pub async fn workout_trends(
  pool: &DbPool,
  user_id: i64,
  filter: &TimeFilter,
  metric: TrendMetric,
  period: TrendPeriod,
) -> Result<WorkoutTrends> {
  let range = filter.resolve(Utc::now());

  let sessions = facts::load_sessions(pool, user_id, &range).await?;
  let set_facts = if metric == TrendMetric::Volume {
    facts::load_set_facts(pool, user_id, &range, None).await?
  } else {
    Vec::new()
  };

  Ok(compute_trends(&sessions, &set_facts, metric, period))
}

/// Pure core over loaded facts.
pub fn compute_trends(
  sessions: &[SessionFact],
  set_facts: &[SetFact],
  metric: TrendMetric,
  period: TrendPeriod,
) -> WorkoutTrends {
  // Volume per session, warmups included.
  let mut session_volume: BTreeMap<i64, f64> = BTreeMap::new();
  for set in set_facts {
    if let Some(volume) = set.volume() {
      *session_volume.entry(set.session_id).or_insert(0.0) += volume;
    }
  }

  let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
  for session in sessions {
    let completed_at = match session.completed_at {
      Some(t) => t,
      None => continue,
    };
    let value = match metric {
      TrendMetric::Volume => session_volume.get(&session.id).copied().unwrap_or(0.0),
      TrendMetric::Duration => session.active_duration.unwrap_or(0) as f64 / 60.0,
      TrendMetric::Frequency => 1.0,
    };
    *buckets.entry(period.bucket_of(completed_at.date_naive())).or_insert(0.0) += value;
  }

  let data = buckets
    .into_iter()
    .map(|(date, value)| TrendPoint {
      date: Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
      value,
    })
    .collect();

  WorkoutTrends { metric, period, data }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
