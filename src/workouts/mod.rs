//! Workout records and their measurements.

pub mod types;

pub use types::{
    group_by_day, CalendarDay, CardioInput, Discipline, LoggedWorkout, Measurements, SetInput,
    REST_DAY_EXERCISE,
};
