//! Source of "today" for streak calculations.

use chrono::{Duration, NaiveDate};
use std::sync::{Arc, Mutex};

/// Provides the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock that only moves when told to (tests, replays, imports).
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        match self.today.lock() {
            Ok(mut today) => *today = date,
            Err(poisoned) => *poisoned.into_inner() = date,
        }
    }

    pub fn advance_days(&self, days: i64) {
        let next = self.today() + Duration::days(days);
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(today) => *today,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let shared = Arc::clone(&clock);

        clock.advance_days(2);
        assert_eq!(shared.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
