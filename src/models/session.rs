use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged workout occurrence. `completed_at` stays NULL while the session
/// is in progress and is set exactly once at completion.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutSession {
  pub id: i64,
  pub user_id: i64,
  pub name: String,
  pub started_at: Option<DateTime<Utc>>,
  pub completed_at: Option<DateTime<Utc>>,
  pub active_duration: Option<i64>,
  pub total_rest_duration: Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
}

/// One exercise instance performed within a session. Superset columns are
/// pass-through metadata; the statistics engine reads but never interprets
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionExercise {
  pub id: i64,
  pub workout_session_id: i64,
  pub exercise_id: i64,
  pub exercise_order: i64,
  pub superset_group_id: Option<String>,
  pub superset_order: Option<i64>,
  pub started_at: Option<DateTime<Utc>>,
  pub completed_at: Option<DateTime<Utc>>,
  pub active_duration: Option<i64>,
}

/// One logged attempt within a session-exercise. `weight` is NULL for
/// unweighted work; a NULL weight or rep count keeps the set out of volume
/// and max-weight math entirely.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutSet {
  pub id: i64,
  pub workout_session_exercise_id: i64,
  pub set_number: i64,
  pub reps_completed: Option<i64>,
  pub weight: Option<f64>,
  pub is_warmup: bool,
  pub rpe: Option<i64>,
  pub rest_start_time: Option<DateTime<Utc>>,
  pub rest_end_time: Option<DateTime<Utc>>,
  pub actual_rest_time: Option<i64>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
