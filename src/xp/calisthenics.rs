//! Calisthenics XP.
//!
//! Bodyweight exercises are scored on repetitions only. The rep range of a
//! set decides whether it trains strength or endurance.

use super::{set_factor, AttributeDelta, XpOutcome};
use crate::workouts::types::SetInput;

/// XP per repetition before the set factor.
const XP_PER_REP: f64 = 3.0;

/// Rep range of a calisthenics set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepBand {
    /// Fewer than 5 reps
    Low,
    /// 5 to 9 reps
    Moderate,
    /// 10 to 14 reps
    High,
    /// 15 reps or more
    Endurance,
}

impl RepBand {
    pub fn from_reps(reps: u32) -> Self {
        match reps {
            0..=4 => RepBand::Low,
            5..=9 => RepBand::Moderate,
            10..=14 => RepBand::High,
            _ => RepBand::Endurance,
        }
    }

    /// (strength, endurance) gained by one set in this band.
    pub fn split(&self) -> (u32, u32) {
        match self {
            RepBand::Low => (2, 0),
            RepBand::Moderate => (2, 1),
            RepBand::High => (1, 2),
            RepBand::Endurance => (0, 3),
        }
    }
}

/// XP and attribute gains for a list of calisthenics sets.
pub fn calisthenics_outcome(sets: &[SetInput]) -> XpOutcome {
    let mut outcome = XpOutcome::default();

    for (index, set) in sets.iter().enumerate() {
        let Some(reps) = set.valid_reps() else {
            tracing::debug!("Skipping invalid calisthenics set #{}: {:?}", index + 1, set);
            continue;
        };

        let set_xp = f64::from(reps) * XP_PER_REP * set_factor(index);
        outcome.xp = outcome.xp.saturating_add(set_xp.floor() as u32);

        let (strength, endurance) = RepBand::from_reps(reps).split();
        outcome.attributes += AttributeDelta {
            strength,
            endurance,
            intelligence: 0,
        };
    }

    outcome
}
