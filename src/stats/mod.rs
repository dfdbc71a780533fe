//! Read-model aggregators over the loaded fact snapshots.
//!
//! One module per statistic. Each exposes a thin async entry point that
//! resolves the time filter and loads facts, plus a pure `compute_*` core the
//! unit tests drive directly.

pub mod exercise_progress;
pub mod muscle_groups;
pub mod overview;
pub mod personal_records;
pub mod trends;

pub use exercise_progress::{exercise_progress, ExerciseProgress};
pub use muscle_groups::{muscle_group_activity, MuscleGroupStats};
pub use overview::{workout_overview, WorkoutOverview};
pub use personal_records::{personal_records, PersonalRecordsPage};
pub use trends::{workout_trends, TrendMetric, TrendPeriod, WorkoutTrends};
