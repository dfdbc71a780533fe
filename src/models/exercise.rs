use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exercise reference data, read-only from the engine's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
  pub id: i64,
  pub name: String,
  pub target_muscle_group: String,
  pub equipment: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
