//! Consecutive-day streak derived from the full activity history.
//!
//! The streak is always recomputed from scratch, so a missed or repeated
//! recomputation heals itself on the next call.

use chrono::{Duration, NaiveDate};

/// One calendar day with at least one workout row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityDay {
    pub date: NaiveDate,
    /// True when every workout on this day is a rest day
    pub rest_only: bool,
}

impl ActivityDay {
    pub fn training(date: NaiveDate) -> Self {
        Self {
            date,
            rest_only: false,
        }
    }

    pub fn rest(date: NaiveDate) -> Self {
        Self {
            date,
            rest_only: true,
        }
    }
}

/// Compute the streak as of `today`.
///
/// The chain must be anchored on today or yesterday, otherwise the streak is
/// 0. From the anchor it extends backwards while days are exactly one apart.
/// Rest days keep the chain intact without adding to it. Days after `today`
/// are ignored.
pub fn compute_streak(days: &[ActivityDay], today: NaiveDate) -> u32 {
    let mut days: Vec<ActivityDay> = days.iter().copied().filter(|d| d.date <= today).collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));

    // Merge duplicate dates: a day counts as training if any row trained
    let mut merged: Vec<ActivityDay> = Vec::with_capacity(days.len());
    for day in days {
        match merged.last_mut() {
            Some(last) if last.date == day.date => last.rest_only &= day.rest_only,
            _ => merged.push(day),
        }
    }

    let Some(anchor) = merged.first() else {
        return 0;
    };
    if today - anchor.date > Duration::days(1) {
        return 0;
    }

    let mut streak = u32::from(!anchor.rest_only);
    let mut previous = anchor.date;

    for day in &merged[1..] {
        if previous - day.date != Duration::days(1) {
            break;
        }
        streak += u32::from(!day.rest_only);
        previous = day.date;
    }

    streak
}
