//! Muscle Up - gamified training log
//!
//! Turns logged strength, cardio and calisthenics workouts into experience
//! points, levels, ranks and attribute scores, and tracks daily training
//! streaks with limited rest days.

pub mod progression;
pub mod storage;
pub mod workouts;
pub mod xp;

// Re-export commonly used types
pub use progression::engine::{ProgressionEngine, ProgressionError};
pub use storage::database::Database;
pub use workouts::types::{CardioInput, Measurements, SetInput};
