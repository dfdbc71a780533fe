pub mod exercise;
pub mod session;

pub use exercise::Exercise;
pub use session::{SessionExercise, WorkoutSession, WorkoutSet};
