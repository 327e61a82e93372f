//! Progression: levels, ranks, streaks, rest days and the engine that
//! applies workouts to user stats.

pub mod clock;
pub mod engine;
pub mod leveling;
pub mod restday;
pub mod stats;
pub mod streak;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    ProgressReport, ProgressionEngine, ProgressionError, RestDayOutcome, WorkoutDeleted,
    WorkoutLogged,
};
pub use leveling::{level_and_progress, rank, LevelCurve, LevelProgress};
pub use restday::{RestDayDenial, RestDayState, MIN_STREAK_FOR_REST_DAY};
pub use stats::UserStats;
pub use streak::{compute_streak, ActivityDay};
