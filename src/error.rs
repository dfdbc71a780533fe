use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

/// Errors surfaced by the statistics engine.
///
/// Insufficient data is never an error: aggregators answer "no workouts yet"
/// with empty collections and zero totals.
#[derive(Error, Debug)]
pub enum StatsError {
  /// A referenced exercise does not exist.
  #[error("exercise {0} not found")]
  NotFound(i64),

  /// A metric/period token could not be parsed. Raised at the API boundary;
  /// aggregators themselves only ever see validated enums.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
