//! XP and attribute calculators.
//!
//! Every calculator is a pure function of a workout's stored measurements and
//! the context snapshotted when it was logged. Applying the result in the
//! "add" or "deduct" direction is left to the caller, which is what keeps a
//! delete exactly symmetric with the original log.

pub mod calisthenics;
pub mod cardio;
pub mod strength;

use serde::{Deserialize, Serialize};

use crate::workouts::types::Measurements;

pub use calisthenics::calisthenics_outcome;
pub use cardio::cardio_outcome;
pub use strength::strength_outcome;

/// Bodyweight assumed when the profile has none recorded.
pub const FALLBACK_BODYWEIGHT_KG: f64 = 75.0;

/// Lowest value the per-set diminishing-returns factor can reach.
const MIN_SET_FACTOR: f64 = 0.5;

/// Direction in which a calculator result is applied to stored stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Add,
    Deduct,
}

/// Attribute increments produced by one workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeDelta {
    pub strength: u32,
    pub endurance: u32,
    pub intelligence: u32,
}

impl AttributeDelta {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl std::ops::AddAssign for AttributeDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.strength += rhs.strength;
        self.endurance += rhs.endurance;
        self.intelligence += rhs.intelligence;
    }
}

/// XP and attribute changes produced by one workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XpOutcome {
    pub xp: u32,
    pub attributes: AttributeDelta,
}

/// User state a calculation depends on, captured at logging time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalcContext {
    /// Bodyweight in kilograms, 0 when unknown
    pub bodyweight_kg: f64,
    /// Consecutive training days
    pub streak_days: u32,
}

impl CalcContext {
    /// Bodyweight if known.
    pub fn known_bodyweight(&self) -> Option<f64> {
        (self.bodyweight_kg.is_finite() && self.bodyweight_kg > 0.0).then_some(self.bodyweight_kg)
    }
}

/// Diminishing-returns factor for the set at `index` (0-based).
///
/// The first set counts fully, each following set 10% less, bottoming out
/// at half value.
pub fn set_factor(index: usize) -> f64 {
    match index {
        0 => 1.0,
        1 => 0.9,
        2 => 0.8,
        3 => 0.7,
        4 => 0.6,
        _ => MIN_SET_FACTOR,
    }
}

/// Dispatch to the calculator of the workout's discipline.
///
/// Rest days are worth nothing.
pub fn calculate(measurements: &Measurements, ctx: &CalcContext) -> XpOutcome {
    match measurements {
        Measurements::Strength(sets) => strength_outcome(sets, ctx),
        Measurements::Calisthenics(sets) => calisthenics_outcome(sets),
        Measurements::Cardio(input) => cardio_outcome(input, ctx),
        Measurements::RestDay => XpOutcome::default(),
    }
}
