use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Engine Configuration
/// ---------------------------------------------------------------------------

/// Toggles for the two aggregation behaviors product has not fully settled.
/// Defaults carry the current behavior; flipping a flag changes the one
/// aggregator that reads it, nothing else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsConfig {
  /// Overview total volume scans every session in range, including ones still
  /// in progress. `false` restricts the scan to completed sessions.
  pub count_in_progress_volume: bool,

  /// Muscle-group `sets_count` counts a set exactly when it contributes to
  /// the volume sum (weight and reps both present). `false` counts any set
  /// with a recorded rep count.
  pub count_only_volume_sets: bool,
}

impl Default for StatsConfig {
  fn default() -> Self {
    Self {
      count_in_progress_volume: true,
      count_only_volume_sets: true,
    }
  }
}
