//! Strength training XP.

use super::{set_factor, AttributeDelta, CalcContext, XpOutcome, FALLBACK_BODYWEIGHT_KG};
use crate::workouts::types::SetInput;

/// Flat XP every valid set earns before volume is counted.
const BASE_SET_XP: f64 = 5.0;

/// Volume (kg x reps) per XP point.
const VOLUME_PER_XP: f64 = 10.0;

/// Multiplier for the load relative to bodyweight.
///
/// Unknown bodyweight falls back to the neutral tier.
pub fn intensity_multiplier(weight: f64, bodyweight_kg: Option<f64>) -> f64 {
    let Some(bw) = bodyweight_kg else {
        return 1.0;
    };

    if weight >= 1.5 * bw {
        1.5
    } else if weight >= bw {
        1.25
    } else if weight < 0.5 * bw {
        0.75
    } else {
        1.0
    }
}

/// XP and strength gain for a list of weighted sets.
pub fn strength_outcome(sets: &[SetInput], ctx: &CalcContext) -> XpOutcome {
    let bodyweight = ctx.known_bodyweight();
    let mut xp = 0u32;
    let mut total_volume = 0.0;
    let mut counted_sets = 0usize;

    for (index, set) in sets.iter().enumerate() {
        let (Some(reps), Some(weight)) = (set.valid_reps(), set.valid_weight()) else {
            tracing::debug!("Skipping invalid strength set #{}: {:?}", index + 1, set);
            continue;
        };

        let volume = weight * f64::from(reps);
        let set_xp = (BASE_SET_XP + volume / VOLUME_PER_XP)
            * set_factor(index)
            * intensity_multiplier(weight, bodyweight);

        xp = xp.saturating_add(set_xp.floor() as u32);
        total_volume += volume;
        counted_sets += 1;
    }

    let strength = if counted_sets == 0 {
        0
    } else {
        let reference = bodyweight.unwrap_or(FALLBACK_BODYWEIGHT_KG);
        ((total_volume / (reference * 5.0)).floor() as u32).max(1)
    };

    XpOutcome {
        xp,
        attributes: AttributeDelta {
            strength,
            ..Default::default()
        },
    }
}
