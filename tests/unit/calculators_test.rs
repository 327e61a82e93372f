//! Unit tests for the XP calculators.

use muscleup::workouts::types::{CardioInput, Measurements, SetInput};
use muscleup::xp::{calculate, AttributeDelta, CalcContext, XpOutcome};

fn ctx(bodyweight_kg: f64, streak_days: u32) -> CalcContext {
    CalcContext {
        bodyweight_kg,
        streak_days,
    }
}

#[test]
fn test_strength_with_known_bodyweight() {
    let squats = Measurements::Strength(vec![SetInput::new(5, 80.0); 3]);
    let outcome = calculate(&squats, &ctx(80.0, 0));

    assert_eq!(outcome.xp, 151);
    assert_eq!(
        outcome.attributes,
        AttributeDelta {
            strength: 3,
            ..Default::default()
        }
    );
}

#[test]
fn test_strength_with_unknown_bodyweight() {
    // Neutral intensity, strength attribute against 75 kg
    let squats = Measurements::Strength(vec![SetInput::new(5, 80.0); 3]);
    let outcome = calculate(&squats, &ctx(0.0, 0));

    assert_eq!(outcome.xp, 45 + 40 + 36);
    assert_eq!(outcome.attributes.strength, 3);
}

#[test]
fn test_strength_ignores_streak() {
    let bench = Measurements::Strength(vec![SetInput::new(8, 60.0), SetInput::new(8, 60.0)]);
    assert_eq!(calculate(&bench, &ctx(80.0, 0)), calculate(&bench, &ctx(80.0, 9)));
}

#[test]
fn test_strength_from_loose_payload() {
    let measurements: Measurements = serde_json::from_str(
        r#"{"discipline": "strength",
            "data": [{"reps": "5", "weight": "80,0"}, {"reps": 5, "weight": 80},
                     {"reps": "five", "weight": 80}, {"reps": 5, "weight": 80}]}"#,
    )
    .unwrap();

    // The unparsable third set keeps its slot: factors 1.0, 0.9, skip, 0.7
    let outcome = calculate(&measurements, &ctx(80.0, 0));
    assert_eq!(outcome.xp, 56 + 50 + 39);
}

#[test]
fn test_calisthenics_rep_bands() {
    let pullups = Measurements::Calisthenics(vec![SetInput::reps_only(12), SetInput::new(6, 74.5)]);
    let outcome = calculate(&pullups, &ctx(64.5, 3));

    // 12 * 3 + floor(6 * 3 * 0.9)
    assert_eq!(outcome.xp, 36 + 16);
    assert_eq!(
        outcome.attributes,
        AttributeDelta {
            strength: 3,
            endurance: 3,
            intelligence: 0,
        }
    );
}

#[test]
fn test_calisthenics_endurance_sets() {
    let pushups = Measurements::Calisthenics(vec![SetInput::reps_only(20); 2]);
    let outcome = calculate(&pushups, &ctx(0.0, 0));

    assert_eq!(outcome.xp, 60 + 54);
    assert_eq!(outcome.attributes.strength, 0);
    assert_eq!(outcome.attributes.endurance, 6);
}

#[test]
fn test_running() {
    let run = Measurements::Cardio(CardioInput::from_activity("Laufen", 30.0, Some(5.0)));
    let outcome = calculate(&run, &ctx(0.0, 0));

    assert_eq!(outcome.xp, 80);
    assert_eq!(outcome.attributes.endurance, 5);
    assert_eq!(outcome.attributes.strength, 0);
}

#[test]
fn test_running_pace_and_streak_bonus() {
    let fast = Measurements::Cardio(CardioInput::Running {
        duration_min: 30.0,
        distance_km: 10.0,
    });
    // 20 km/h caps the pace bonus at +50%
    assert_eq!(calculate(&fast, &ctx(0.0, 0)).xp, 195);

    let steady = Measurements::Cardio(CardioInput::Running {
        duration_min: 30.0,
        distance_km: 5.0,
    });
    // Streak bonus stops growing after 10 days
    assert_eq!(calculate(&steady, &ctx(0.0, 10)).xp, 96);
    assert_eq!(calculate(&steady, &ctx(0.0, 40)).xp, 96);
}

#[test]
fn test_swimming() {
    let swim = Measurements::Cardio(CardioInput::from_activity("Schwimmen", 20.0, Some(1.0)));
    let outcome = calculate(&swim, &ctx(0.0, 0));

    assert_eq!(outcome.xp, 105);
    assert_eq!(outcome.attributes.endurance, 4);
    assert_eq!(outcome.attributes.strength, 1);
}

#[test]
fn test_team_sport_trains_intelligence() {
    let football = Measurements::Cardio(CardioInput::from_activity("Fußball", 90.0, None));
    let outcome = calculate(&football, &ctx(0.0, 0));

    assert_eq!(outcome.xp, 108);
    assert_eq!(
        outcome.attributes,
        AttributeDelta {
            strength: 3,
            endurance: 6,
            intelligence: 4,
        }
    );
}

#[test]
fn test_invalid_cardio_is_worth_nothing() {
    let broken = Measurements::Cardio(CardioInput::Running {
        duration_min: -5.0,
        distance_km: 3.0,
    });
    assert_eq!(calculate(&broken, &ctx(0.0, 3)), XpOutcome::default());

    let no_distance = Measurements::Cardio(CardioInput::Running {
        duration_min: 30.0,
        distance_km: f64::NAN,
    });
    assert_eq!(calculate(&no_distance, &ctx(0.0, 0)).xp, 30);
}
