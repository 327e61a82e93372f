//! Rest-day eligibility.

use serde::Serialize;

/// Streak needed before a rest day may be taken.
pub const MIN_STREAK_FOR_REST_DAY: u32 = 2;

/// Why a rest day was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RestDayDenial {
    /// Not enough consecutive training days yet
    StreakTooShort { streak_days: u32 },
    /// A rest day already exists for the requested date
    AlreadyRested,
    /// The previous day was already a rest day
    RestedPreviousDay,
    /// The following day already is a rest day
    RestedNextDay,
}

impl std::fmt::Display for RestDayDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestDayDenial::StreakTooShort { streak_days } => write!(
                f,
                "A rest day needs at least {} consecutive training days (current streak: {})",
                MIN_STREAK_FOR_REST_DAY, streak_days
            ),
            RestDayDenial::AlreadyRested => write!(f, "A rest day is already logged for this day"),
            RestDayDenial::RestedPreviousDay | RestDayDenial::RestedNextDay => {
                write!(f, "Two rest days in a row are not allowed")
            }
        }
    }
}

/// Rest-day state of one user around a requested date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestDayState {
    pub streak_days: u32,
    pub rest_on_date: bool,
    pub rest_on_previous_day: bool,
    pub rest_on_next_day: bool,
}

impl RestDayState {
    /// The reason a rest day is not allowed, if any.
    pub fn denial(&self) -> Option<RestDayDenial> {
        if self.streak_days < MIN_STREAK_FOR_REST_DAY {
            Some(RestDayDenial::StreakTooShort {
                streak_days: self.streak_days,
            })
        } else if self.rest_on_date {
            Some(RestDayDenial::AlreadyRested)
        } else if self.rest_on_previous_day {
            Some(RestDayDenial::RestedPreviousDay)
        } else if self.rest_on_next_day {
            Some(RestDayDenial::RestedNextDay)
        } else {
            None
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.denial().is_none()
    }
}
