//! Fact loading: the single point where the statistics engine touches
//! storage.
//!
//! Each loader issues one batched query keyed by user and resolved time
//! range, joining through the session graph so aggregators work over flat
//! in-memory facts instead of walking relationships row by row.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::DbPool;
use crate::error::Result;
use crate::filter::DateRange;
use crate::formulas;

/// ---------------------------------------------------------------------------
/// Fact Rows
/// ---------------------------------------------------------------------------

/// One set, annotated with its owning session and exercise.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SetFact {
  pub session_id: i64,
  pub session_started_at: Option<DateTime<Utc>>,
  pub session_completed_at: Option<DateTime<Utc>>,
  pub exercise_id: i64,
  pub exercise_name: String,
  pub muscle_group: String,
  pub set_number: i64,
  pub reps_completed: Option<i64>,
  pub weight: Option<f64>,
  pub is_warmup: bool,
}

impl SetFact {
  /// Volume this set contributes, when both weight and reps were recorded.
  pub fn volume(&self) -> Option<f64> {
    formulas::set_volume(self.weight, self.reps_completed)
  }

  pub fn session_completed(&self) -> bool {
    self.session_completed_at.is_some()
  }
}

/// Session-only fact for duration and frequency work.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionFact {
  pub id: i64,
  pub name: String,
  pub started_at: Option<DateTime<Utc>>,
  pub completed_at: Option<DateTime<Utc>>,
  pub active_duration: Option<i64>,
}

/// Exercise identity for aggregators that are scoped to one exercise.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExerciseRef {
  pub id: i64,
  pub name: String,
  pub target_muscle_group: String,
}

/// ---------------------------------------------------------------------------
/// Loaders
/// ---------------------------------------------------------------------------

/// Load every set belonging to the user whose session started within the
/// range, joined to session and exercise metadata. `exercise_id` narrows to a
/// single exercise when given. Ordered by session start, then set number.
pub async fn load_set_facts(
  pool: &DbPool,
  user_id: i64,
  range: &DateRange,
  exercise_id: Option<i64>,
) -> Result<Vec<SetFact>> {
  let facts = sqlx::query_as::<_, SetFact>(
    r#"
    SELECT
      ws.id AS session_id,
      ws.started_at AS session_started_at,
      ws.completed_at AS session_completed_at,
      e.id AS exercise_id,
      e.name AS exercise_name,
      e.target_muscle_group AS muscle_group,
      s.set_number,
      s.reps_completed,
      s.weight,
      s.is_warmup
    FROM workout_sets s
    JOIN workout_session_exercises se ON se.id = s.workout_session_exercise_id
    JOIN workout_sessions ws ON ws.id = se.workout_session_id
    JOIN exercises e ON e.id = se.exercise_id
    WHERE ws.user_id = ?1
      AND (?2 IS NULL OR ws.started_at >= ?2)
      AND (?3 IS NULL OR ws.started_at <= ?3)
      AND (?4 IS NULL OR se.exercise_id = ?4)
    ORDER BY ws.started_at, s.set_number
    "#,
  )
  .bind(user_id)
  .bind(range.start)
  .bind(range.end)
  .bind(exercise_id)
  .fetch_all(pool)
  .await?;

  log::debug!("loaded {} set facts for user {}", facts.len(), user_id);

  Ok(facts)
}

/// Load the user's sessions that started within the range, ordered by start
/// time. Completion filtering is the aggregator's business.
pub async fn load_sessions(
  pool: &DbPool,
  user_id: i64,
  range: &DateRange,
) -> Result<Vec<SessionFact>> {
  let sessions = sqlx::query_as::<_, SessionFact>(
    r#"
    SELECT id, name, started_at, completed_at, active_duration
    FROM workout_sessions
    WHERE user_id = ?1
      AND (?2 IS NULL OR started_at >= ?2)
      AND (?3 IS NULL OR started_at <= ?3)
    ORDER BY started_at
    "#,
  )
  .bind(user_id)
  .bind(range.start)
  .bind(range.end)
  .fetch_all(pool)
  .await?;

  log::debug!("loaded {} sessions for user {}", sessions.len(), user_id);

  Ok(sessions)
}

/// Look up an exercise by id. `None` backs the NotFound contract of the
/// exercise-progress aggregator.
pub async fn find_exercise(pool: &DbPool, exercise_id: i64) -> Result<Option<ExerciseRef>> {
  let exercise = sqlx::query_as::<_, ExerciseRef>(
    "SELECT id, name, target_muscle_group FROM exercises WHERE id = ?1",
  )
  .bind(exercise_id)
  .fetch_optional(pool)
  .await?;

  Ok(exercise)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filter::{Period, TimeFilter};
  use crate::test_utils::*;

  #[tokio::test]
  async fn test_set_facts_join_session_and_exercise() {
    let pool = setup_test_db().await;
    let bench = seed_exercise(&pool, "Bench Press", "Chest").await;

    let session = seed_completed_session(&pool, USER, 1).await;
    let se = seed_session_exercise(&pool, session, bench, 0).await;
    seed_set(&pool, se, 1, Some(8), Some(100.0), false).await;
    seed_set(&pool, se, 2, Some(8), Some(102.5), false).await;

    let facts = load_set_facts(&pool, USER, &DateRange::unbounded(), None)
      .await
      .unwrap();

    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0].exercise_name, "Bench Press");
    assert_eq!(facts[0].muscle_group, "Chest");
    assert_eq!(facts[0].session_id, session);
    assert!(facts[0].session_completed());
    assert_eq!(facts[0].set_number, 1);
    assert_eq!(facts[1].weight, Some(102.5));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_set_facts_scoped_to_user_and_exercise() {
    let pool = setup_test_db().await;
    let bench = seed_exercise(&pool, "Bench Press", "Chest").await;
    let squat = seed_exercise(&pool, "Squat", "Legs").await;

    let mine = seed_completed_session(&pool, USER, 1).await;
    let mine_se = seed_session_exercise(&pool, mine, bench, 0).await;
    seed_set(&pool, mine_se, 1, Some(5), Some(80.0), false).await;
    let mine_squat = seed_session_exercise(&pool, mine, squat, 1).await;
    seed_set(&pool, mine_squat, 1, Some(5), Some(120.0), false).await;

    let theirs = seed_completed_session(&pool, OTHER_USER, 1).await;
    let theirs_se = seed_session_exercise(&pool, theirs, bench, 0).await;
    seed_set(&pool, theirs_se, 1, Some(5), Some(200.0), false).await;

    let all_mine = load_set_facts(&pool, USER, &DateRange::unbounded(), None)
      .await
      .unwrap();
    assert_eq!(all_mine.len(), 2);

    let bench_only = load_set_facts(&pool, USER, &DateRange::unbounded(), Some(bench))
      .await
      .unwrap();
    assert_eq!(bench_only.len(), 1);
    assert_eq!(bench_only[0].weight, Some(80.0));

    // Unknown user degrades to no data, not an error.
    let nobody = load_set_facts(&pool, 9999, &DateRange::unbounded(), None)
      .await
      .unwrap();
    assert!(nobody.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_range_bounds_apply_to_session_start() {
    let pool = setup_test_db().await;
    let bench = seed_exercise(&pool, "Bench Press", "Chest").await;

    let recent = seed_completed_session(&pool, USER, 1).await;
    let old = seed_completed_session(&pool, USER, 40).await;
    for session in [recent, old] {
      let se = seed_session_exercise(&pool, session, bench, 0).await;
      seed_set(&pool, se, 1, Some(8), Some(100.0), false).await;
    }

    let range = TimeFilter::period(Period::Month).resolve(chrono::Utc::now());
    let facts = load_set_facts(&pool, USER, &range, None).await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].session_id, recent);

    let sessions = load_sessions(&pool, USER, &range).await.unwrap();
    assert_eq!(sessions.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sessions_ordered_by_start() {
    let pool = setup_test_db().await;
    let a = seed_completed_session(&pool, USER, 1).await;
    let b = seed_completed_session(&pool, USER, 10).await;
    let c = seed_in_progress_session(&pool, USER, 5).await;

    let sessions = load_sessions(&pool, USER, &DateRange::unbounded())
      .await
      .unwrap();
    let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![b, c, a]);
    assert!(sessions[1].completed_at.is_none());

    // Ordering is ascending in time.
    let mut starts: Vec<_> = sessions.iter().filter_map(|s| s.started_at).collect();
    let sorted = starts.clone();
    starts.sort();
    assert_eq!(starts, sorted);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_find_exercise() {
    let pool = setup_test_db().await;
    let id = seed_exercise(&pool, "Deadlift", "Back").await;

    let found = find_exercise(&pool, id).await.unwrap().unwrap();
    assert_eq!(found.name, "Deadlift");
    assert_eq!(found.target_muscle_group, "Back");

    assert!(find_exercise(&pool, id + 1000).await.unwrap().is_none());

    teardown_test_db(pool).await;
  }
}
