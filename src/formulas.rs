//! Pure metric formulas shared by the aggregators.
//!
//! Everything in here is deterministic math over plain values; the aggregators
//! decide which sets qualify before calling in.

use chrono::{DateTime, Utc};

/// ---------------------------------------------------------------------------
/// One-Rep Max (Brzycki)
/// ---------------------------------------------------------------------------

/// Estimate a one-rep max from a submaximal set using the Brzycki formula.
///
/// Returns `None` outside the formula's domain (negative reps, or reps >= 37
/// where the denominator goes non-positive) instead of letting a negative or
/// infinite estimate escape into a response.
pub fn estimate_one_rep_max(weight: f64, reps: i64) -> Option<f64> {
  match reps {
    0 => Some(0.0),
    1 => Some(weight),
    2..=36 => Some(weight * 36.0 / (37.0 - reps as f64)),
    _ => None,
  }
}

/// ---------------------------------------------------------------------------
/// Set Volume
/// ---------------------------------------------------------------------------

/// Volume of a single set: weight * reps, defined only when both values were
/// recorded. A zero weight or rep count is a valid zero volume; a missing one
/// keeps the set out of volume math entirely.
pub fn set_volume(weight: Option<f64>, reps: Option<i64>) -> Option<f64> {
  match (weight, reps) {
    (Some(w), Some(r)) => Some(w * r as f64),
    _ => None,
  }
}

/// ---------------------------------------------------------------------------
/// Recovery Status
/// ---------------------------------------------------------------------------

/// Linear recovery decay: 33.33%/day since last trained, capped at 100
/// (fully recovered after three days).
pub fn recovery_status(last_trained: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
  let days_since = (now - last_trained).num_days().max(0) as f64;
  (days_since * 33.33).min(100.0)
}

/// ---------------------------------------------------------------------------
/// Workout Consistency
/// ---------------------------------------------------------------------------

/// Consistency as a percentage of a 3-workouts-per-week target, from the
/// start times of completed sessions.
///
/// With everything on one calendar day there is no week span to divide by:
/// one or more workouts on a single day count as fully consistent, an empty
/// history as zero.
pub fn workout_consistency(started_ats: &[DateTime<Utc>]) -> f64 {
  if started_ats.is_empty() {
    return 0.0;
  }

  let first = started_ats.iter().min().copied().unwrap_or_default();
  let last = started_ats.iter().max().copied().unwrap_or_default();

  let single_day = started_ats
    .iter()
    .all(|t| t.date_naive() == first.date_naive());
  if single_day {
    return 100.0;
  }

  let day_span = (last - first).num_days();
  if day_span <= 0 {
    // Spread across midnight but less than a full day apart.
    return 100.0;
  }

  let weeks_spanned = day_span as f64 / 7.0;
  let workouts_per_week = started_ats.len() as f64 / weeks_spanned;
  ((workouts_per_week / 3.0) * 100.0).min(100.0)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
