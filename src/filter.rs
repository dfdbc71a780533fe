//! Time-range resolution for statistics queries.
//!
//! Callers pass either explicit calendar dates, a named period ("last 30
//! days" style), or both. Resolution turns that into a concrete pair of
//! optional instant bounds on session start time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// ---------------------------------------------------------------------------
/// Named Periods
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
  #[default]
  All,
  Week,
  Month,
  Year,
}

impl Period {
  /// Lookback window in days; `None` for the unbounded period.
  fn lookback_days(self) -> Option<i64> {
    match self {
      Period::All => None,
      Period::Week => Some(7),
      Period::Month => Some(30),
      Period::Year => Some(365),
    }
  }
}

impl std::fmt::Display for Period {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Period::All => write!(f, "all"),
      Period::Week => write!(f, "week"),
      Period::Month => write!(f, "month"),
      Period::Year => write!(f, "year"),
    }
  }
}

impl std::str::FromStr for Period {
  type Err = StatsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "all" => Ok(Period::All),
      "week" => Ok(Period::Week),
      "month" => Ok(Period::Month),
      "year" => Ok(Period::Year),
      _ => Err(StatsError::InvalidInput(format!(
        "unknown period '{}', expected all/week/month/year",
        s
      ))),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Time Filter
/// ---------------------------------------------------------------------------

/// Raw filter parameters as the API layer hands them over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeFilter {
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
  #[serde(default)]
  pub period: Period,
}

/// Resolved instant bounds. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: Option<DateTime<Utc>>,
  pub end: Option<DateTime<Utc>>,
}

impl DateRange {
  pub fn unbounded() -> Self {
    Self { start: None, end: None }
  }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
  Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
  // Last representable millisecond of the day, so a same-day range covers the
  // whole day inclusively.
  day_start(date) + Duration::days(1) - Duration::milliseconds(1)
}

impl TimeFilter {
  pub fn period(period: Period) -> Self {
    Self { period, ..Default::default() }
  }

  /// Resolve against the supplied clock.
  ///
  /// Explicit dates expand to full calendar days. When both explicit dates
  /// are present they win outright and the period is ignored; otherwise a
  /// non-`all` period contributes a "now minus N days" lower bound, and if an
  /// explicit start is also present the later of the two bounds applies.
  pub fn resolve(&self, now: DateTime<Utc>) -> DateRange {
    let explicit_start = self.start_date.map(day_start);
    let explicit_end = self.end_date.map(day_end);

    if explicit_start.is_some() && explicit_end.is_some() {
      return DateRange { start: explicit_start, end: explicit_end };
    }

    let period_start = self.period.lookback_days().map(|d| now - Duration::days(d));

    let start = match (explicit_start, period_start) {
      (Some(e), Some(p)) => Some(e.max(p)),
      (Some(e), None) => Some(e),
      (None, p) => p,
    };

    DateRange { start, end: explicit_end }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
