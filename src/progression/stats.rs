//! Per-user progression stats.

use serde::{Deserialize, Serialize};

use crate::xp::{Direction, XpOutcome};

/// Bonus score points per streak day on displayed strength and endurance.
pub const STREAK_SCORE_BONUS: u32 = 2;

/// Stored progression state of one user.
///
/// All counters are unsigned; deductions saturate at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub xp_total: u32,
    pub streak_days: u32,
    pub attr_strength: u32,
    pub attr_endurance: u32,
    pub attr_intelligence: u32,
}

impl UserStats {
    /// Apply a calculator outcome in the given direction.
    pub fn apply(&mut self, outcome: &XpOutcome, direction: Direction) {
        let attrs = &outcome.attributes;
        match direction {
            Direction::Add => {
                self.xp_total = self.xp_total.saturating_add(outcome.xp);
                self.attr_strength = self.attr_strength.saturating_add(attrs.strength);
                self.attr_endurance = self.attr_endurance.saturating_add(attrs.endurance);
                self.attr_intelligence = self.attr_intelligence.saturating_add(attrs.intelligence);
            }
            Direction::Deduct => {
                self.xp_total = self.xp_total.saturating_sub(outcome.xp);
                self.attr_strength = self.attr_strength.saturating_sub(attrs.strength);
                self.attr_endurance = self.attr_endurance.saturating_sub(attrs.endurance);
                self.attr_intelligence = self.attr_intelligence.saturating_sub(attrs.intelligence);
            }
        }
    }

    /// Displayed strength: raw attribute plus the streak bonus.
    pub fn strength_score(&self) -> u32 {
        self.attr_strength
            .saturating_add(self.streak_days.saturating_mul(STREAK_SCORE_BONUS))
    }

    /// Displayed endurance: raw attribute plus the streak bonus.
    pub fn endurance_score(&self) -> u32 {
        self.attr_endurance
            .saturating_add(self.streak_days.saturating_mul(STREAK_SCORE_BONUS))
    }
}
