//! Level curve and rank tiers.
//!
//! Level requirements grow geometrically: 100 XP for level 2, then each
//! requirement is the previous one times a growth factor that itself creeps
//! up a little every level. Requirements are rounded up to a multiple of 10.

use serde::{Deserialize, Serialize};

/// XP needed to leave level 1.
pub const DEFAULT_BASE_XP: u32 = 100;

/// Initial multiplier between consecutive level requirements.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.5;

/// Increase of the growth factor per level gained.
pub const DEFAULT_GROWTH_STEP: f64 = 0.005;

/// Highest level covered by a rank band.
pub const MAX_RANKED_LEVEL: u32 = 50;

/// Levels per rank band.
const LEVELS_PER_RANK: u32 = 5;

/// Largest requirement, the biggest multiple of 10 that fits in u32.
const MAX_REQUIREMENT: u64 = (u32::MAX / 10 * 10) as u64;

/// Position of a user on the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Current level (starts at 1)
    pub level: u32,
    /// Fraction of the current level completed, in `[0, 1)`
    pub progress: f64,
    /// XP the current level requires in total
    pub xp_for_next: u32,
    /// XP already earned within the current level
    pub xp_in_level: u32,
}

/// Parameters of the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub base_xp: u32,
    pub growth_factor: f64,
    pub growth_step: f64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_xp: DEFAULT_BASE_XP,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            growth_step: DEFAULT_GROWTH_STEP,
        }
    }
}

impl LevelCurve {
    /// Create a curve, rejecting parameters that would not grow.
    pub fn new(base_xp: u32, growth_factor: f64, growth_step: f64) -> Result<Self, &'static str> {
        if base_xp == 0 {
            return Err("base XP must be positive");
        }
        if !growth_factor.is_finite() || growth_factor <= 1.0 {
            return Err("growth factor must be greater than 1");
        }
        if !growth_step.is_finite() || growth_step < 0.0 {
            return Err("growth step must not be negative");
        }

        Ok(Self {
            base_xp,
            growth_factor,
            growth_step,
        })
    }

    /// Level and in-level progress for a cumulative XP total.
    pub fn progress(&self, xp_total: u32) -> LevelProgress {
        let mut level = 1u32;
        let mut remaining = u64::from(xp_total);
        let mut factor = self.growth_factor;
        let mut required = round_up_to_ten(u64::from(self.base_xp));

        while remaining >= required {
            remaining -= required;
            level += 1;
            // Float-to-int casts saturate, huge factors end at the cap
            let grown = (required as f64 * factor) as u64;
            // Keep requirements strictly increasing even for tiny factors
            required = round_up_to_ten(grown)
                .max(required + 10)
                .min(MAX_REQUIREMENT);
            factor += self.growth_step;
        }

        // remaining < required <= MAX_REQUIREMENT, both fit in u32
        let xp_in_level = remaining as u32;
        let xp_for_next = required as u32;

        LevelProgress {
            level,
            progress: remaining as f64 / required as f64,
            xp_for_next,
            xp_in_level,
        }
    }
}

fn round_up_to_ten(value: u64) -> u64 {
    (value.min(MAX_REQUIREMENT).div_ceil(10) * 10).max(10)
}

/// Level and progress on the default curve.
pub fn level_and_progress(xp_total: u32) -> LevelProgress {
    LevelCurve::default().progress(xp_total)
}

/// Rank tier (1-10) for a level, 0 when there is no level.
///
/// Levels 1-5 are rank 1, 6-10 rank 2 and so on up to rank 10 for levels
/// 46-50. Levels beyond 50 stay at the top rank.
pub fn rank(level: u32) -> u8 {
    if level == 0 {
        return 0;
    }
    // At most MAX_RANKED_LEVEL / LEVELS_PER_RANK, fits in u8
    ((level.min(MAX_RANKED_LEVEL) - 1) / LEVELS_PER_RANK + 1) as u8
}
