//! Cardio XP.
//!
//! Running and swimming are scored on duration and distance with a bonus
//! for pace; team sports on duration alone. A running streak adds up to
//! 20% on top.

use super::{AttributeDelta, CalcContext, XpOutcome};
use crate::workouts::types::CardioInput;

/// Upper bound of the pace bonus (+50%).
const MAX_SPEED_BONUS: f64 = 0.5;

/// Streak days that still raise the streak bonus.
const MAX_STREAK_BONUS_DAYS: u32 = 10;

/// Bonus percent per streak day.
const STREAK_BONUS_PERCENT_PER_DAY: u32 = 2;

/// Reference running pace in km/h.
const RUNNING_REFERENCE_KMH: f64 = 10.0;

/// Reference swimming pace in km/h.
const SWIMMING_REFERENCE_KMH: f64 = 2.0;

/// Pace bonus relative to a reference speed, in `[0, 0.5]`.
pub fn speed_bonus(distance_km: f64, duration_min: f64, reference_kmh: f64) -> f64 {
    if duration_min <= 0.0 || distance_km <= 0.0 {
        return 0.0;
    }
    let speed_kmh = distance_km / (duration_min / 60.0);
    ((speed_kmh - reference_kmh) / reference_kmh).clamp(0.0, MAX_SPEED_BONUS)
}

/// Streak multiplier in percent (100 = no bonus).
pub fn streak_percent(streak_days: u32) -> u32 {
    100 + STREAK_BONUS_PERCENT_PER_DAY * streak_days.min(MAX_STREAK_BONUS_DAYS)
}

/// XP and attribute gains for one cardio activity.
pub fn cardio_outcome(input: &CardioInput, ctx: &CalcContext) -> XpOutcome {
    let duration = input.duration_min();
    if !duration.is_finite() || duration <= 0.0 {
        tracing::debug!("Skipping cardio activity without a valid duration: {:?}", input);
        return XpOutcome::default();
    }

    let (base, bonus, attributes) = match input {
        CardioInput::Running { distance_km, .. } => {
            let distance = sanitize_distance(*distance_km);
            let endurance = (duration / 10.0).floor() as u32 + (distance / 2.0).floor() as u32;
            (
                duration + 10.0 * distance,
                speed_bonus(distance, duration, RUNNING_REFERENCE_KMH),
                AttributeDelta {
                    endurance: endurance.max(1),
                    ..Default::default()
                },
            )
        }
        CardioInput::Swimming { distance_km, .. } => {
            let distance = sanitize_distance(*distance_km);
            let endurance = (duration / 10.0).floor() as u32 + (distance * 2.0).floor() as u32;
            (
                duration * 3.0 / 2.0 + 40.0 * distance,
                speed_bonus(distance, duration, SWIMMING_REFERENCE_KMH),
                AttributeDelta {
                    strength: (duration / 20.0).floor() as u32,
                    endurance: endurance.max(1),
                    intelligence: 0,
                },
            )
        }
        CardioInput::TeamSport { .. } => (
            duration * 6.0 / 5.0,
            0.0,
            AttributeDelta {
                strength: (duration / 30.0).floor() as u32,
                endurance: ((duration / 15.0).floor() as u32).max(1),
                intelligence: (duration / 20.0).floor() as u32,
            },
        ),
    };

    let percent = f64::from(streak_percent(ctx.streak_days));
    let xp = (base * (1.0 + bonus) * percent / 100.0).floor() as u32;

    XpOutcome { xp, attributes }
}

fn sanitize_distance(distance_km: f64) -> f64 {
    if distance_km.is_finite() && distance_km > 0.0 {
        distance_km
    } else {
        0.0
    }
}
