//! Test utilities: in-memory database setup and seed factories for building
//! workout histories.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

pub const USER: i64 = 1;
pub const OTHER_USER: i64 = 2;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing, with migrations applied.
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures.
pub async fn setup_test_db() -> SqlitePool {
  let _ = env_logger::builder().is_test(true).try_init();

  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Seed Factories
/// ---------------------------------------------------------------------------

pub async fn seed_exercise(pool: &SqlitePool, name: &str, muscle_group: &str) -> i64 {
  sqlx::query(
    "INSERT INTO exercises (name, target_muscle_group, equipment) VALUES (?1, ?2, 'Barbell')",
  )
  .bind(name)
  .bind(muscle_group)
  .execute(pool)
  .await
  .expect("Failed to insert exercise")
  .last_insert_rowid()
}

/// Insert a session with explicit timestamps and duration.
pub async fn seed_session(
  pool: &SqlitePool,
  user_id: i64,
  started_at: Option<DateTime<Utc>>,
  completed_at: Option<DateTime<Utc>>,
  active_duration: Option<i64>,
) -> i64 {
  sqlx::query(
    r#"
    INSERT INTO workout_sessions (user_id, name, started_at, completed_at, active_duration)
    VALUES (?1, 'Test Workout', ?2, ?3, ?4)
    "#,
  )
  .bind(user_id)
  .bind(started_at)
  .bind(completed_at)
  .bind(active_duration)
  .execute(pool)
  .await
  .expect("Failed to insert session")
  .last_insert_rowid()
}

/// A one-hour session started `days_ago`, completed an hour later.
pub async fn seed_completed_session(pool: &SqlitePool, user_id: i64, days_ago: i64) -> i64 {
  let started = Utc::now() - Duration::days(days_ago);
  seed_session(pool, user_id, Some(started), Some(started + Duration::hours(1)), Some(3600)).await
}

/// A session started `days_ago` that was never completed.
pub async fn seed_in_progress_session(pool: &SqlitePool, user_id: i64, days_ago: i64) -> i64 {
  let started = Utc::now() - Duration::days(days_ago);
  seed_session(pool, user_id, Some(started), None, None).await
}

pub async fn seed_session_exercise(
  pool: &SqlitePool,
  session_id: i64,
  exercise_id: i64,
  order: i64,
) -> i64 {
  sqlx::query(
    r#"
    INSERT INTO workout_session_exercises (workout_session_id, exercise_id, exercise_order)
    VALUES (?1, ?2, ?3)
    "#,
  )
  .bind(session_id)
  .bind(exercise_id)
  .bind(order)
  .execute(pool)
  .await
  .expect("Failed to insert session exercise")
  .last_insert_rowid()
}

pub async fn seed_set(
  pool: &SqlitePool,
  session_exercise_id: i64,
  set_number: i64,
  reps: Option<i64>,
  weight: Option<f64>,
  is_warmup: bool,
) -> i64 {
  sqlx::query(
    r#"
    INSERT INTO workout_sets (workout_session_exercise_id, set_number, reps_completed, weight, is_warmup)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(session_exercise_id)
  .bind(set_number)
  .bind(reps)
  .bind(weight)
  .bind(is_warmup)
  .execute(pool)
  .await
  .expect("Failed to insert set")
  .last_insert_rowid()
}

/// Seed a completed session with one exercise and the given (reps, weight)
/// working sets. Returns the session id.
pub async fn seed_simple_session(
  pool: &SqlitePool,
  user_id: i64,
  exercise_id: i64,
  days_ago: i64,
  sets: &[(i64, f64)],
) -> i64 {
  let session = seed_completed_session(pool, user_id, days_ago).await;
  let se = seed_session_exercise(pool, session, exercise_id, 0).await;
  for (i, (reps, weight)) in sets.iter().enumerate() {
    seed_set(pool, se, i as i64 + 1, Some(*reps), Some(*weight), false).await;
  }
  session
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance.
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN \
       ('exercises', 'workout_sessions', 'workout_session_exercises', 'workout_sets')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_factories_build_a_session_graph() {
    let pool = setup_test_db().await;

    let exercise = seed_exercise(&pool, "Overhead Press", "Shoulders").await;
    let session = seed_simple_session(&pool, USER, exercise, 1, &[(8, 40.0), (8, 42.5)]).await;

    let sets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_sets")
      .fetch_one(&pool)
      .await
      .expect("Failed to count sets");
    assert_eq!(sets, 2);

    let completed: Option<DateTime<Utc>> =
      sqlx::query_scalar("SELECT completed_at FROM workout_sessions WHERE id = ?1")
        .bind(session)
        .fetch_one(&pool)
        .await
        .expect("Failed to read session");
    assert!(completed.is_some());

    teardown_test_db(pool).await;
  }
}
