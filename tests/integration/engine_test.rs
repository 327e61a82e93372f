//! Integration tests for the progression engine.
//!
//! Drives a user through a few weeks of training on an in-memory database
//! with a manual clock.

use chrono::NaiveDate;
use muscleup::progression::{
    ManualClock, ProgressionEngine, ProgressionError, RestDayDenial, RestDayOutcome, UserStats,
};
use muscleup::storage::Database;
use muscleup::workouts::types::{CardioInput, Measurements, SetInput};
use std::sync::Arc;
use uuid::Uuid;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, n).unwrap()
}

fn setup() -> (ProgressionEngine, Arc<ManualClock>, Uuid) {
    let clock = Arc::new(ManualClock::new(day(1)));
    let engine = ProgressionEngine::new(Database::open_in_memory().unwrap())
        .with_clock(Arc::clone(&clock));
    let user = engine.register_user("lena").unwrap();
    engine.set_body_measurements(user, 70.0, Some(172.0)).unwrap();
    (engine, clock, user)
}

fn bench() -> Measurements {
    Measurements::Strength(vec![SetInput::new(8, 60.0); 4])
}

fn run() -> Measurements {
    Measurements::Cardio(CardioInput::Running {
        duration_min: 40.0,
        distance_km: 7.0,
    })
}

#[test]
fn test_log_then_delete_everything_restores_zero() {
    let (engine, clock, user) = setup();
    let mut ids = Vec::new();

    for n in 1..=6 {
        clock.set(day(n));
        ids.push(engine.log_workout(user, day(n), "Bench", bench()).unwrap().workout_id);
        ids.push(engine.log_workout(user, day(n), "Run", run()).unwrap().workout_id);
        let pullups = Measurements::Calisthenics(vec![SetInput::reps_only(8); 3]);
        ids.push(engine.log_workout(user, day(n), "Pull-ups", pullups).unwrap().workout_id);
    }
    assert!(engine.stats(user).unwrap().xp_total > 0);

    // Delete in a different order than logged
    ids.reverse();
    ids.swap(0, 7);
    for id in ids {
        engine.delete_workout(user, id).unwrap();
    }

    assert_eq!(engine.stats(user).unwrap(), UserStats::default());
    assert!(engine.calendar(user).unwrap().is_empty());
}

#[test]
fn test_streak_with_rest_days() {
    let (engine, clock, user) = setup();

    // Two training days earn the first rest day
    engine.log_workout(user, day(1), "Bench", bench()).unwrap();
    clock.set(day(2));
    engine.log_workout(user, day(2), "Run", run()).unwrap();
    clock.set(day(3));
    assert!(engine.log_restday(user, day(3)).unwrap().is_logged());

    clock.set(day(4));
    engine.log_workout(user, day(4), "Bench", bench()).unwrap();
    assert_eq!(engine.stats(user).unwrap().streak_days, 3);

    // Rest day on the 5th, missed the 6th: the chain breaks on the 7th
    clock.set(day(5));
    assert!(engine.log_restday(user, day(5)).unwrap().is_logged());
    clock.set(day(7));
    assert_eq!(engine.update_streak(user).unwrap(), 0);

    let outcome = engine.log_restday(user, day(7)).unwrap();
    assert_eq!(
        outcome,
        RestDayOutcome::Declined {
            denial: RestDayDenial::StreakTooShort { streak_days: 0 }
        }
    );

    engine.log_workout(user, day(7), "Run", run()).unwrap();
    assert_eq!(engine.stats(user).unwrap().streak_days, 1);
}

#[test]
fn test_rest_day_before_existing_rest_day_declined() {
    let (engine, clock, user) = setup();

    for n in 1..=3 {
        clock.set(day(n));
        engine.log_workout(user, day(n), "Bench", bench()).unwrap();
    }
    clock.set(day(4));
    assert!(engine.log_restday(user, day(4)).unwrap().is_logged());

    assert_eq!(
        engine.rest_day_denial(user, day(3)).unwrap(),
        Some(RestDayDenial::RestedNextDay)
    );
    assert!(!engine.check_restday(user, day(4)).unwrap());

    clock.set(day(5));
    assert_eq!(
        engine.rest_day_denial(user, day(5)).unwrap(),
        Some(RestDayDenial::RestedPreviousDay)
    );
}

#[test]
fn test_deleting_rest_day_gives_nothing_back() {
    let (engine, clock, user) = setup();

    engine.log_workout(user, day(1), "Bench", bench()).unwrap();
    clock.set(day(2));
    engine.log_workout(user, day(2), "Bench", bench()).unwrap();
    clock.set(day(3));
    let RestDayOutcome::Logged { workout_id } = engine.log_restday(user, day(3)).unwrap() else {
        panic!("rest day should be allowed");
    };
    let before = engine.stats(user).unwrap();

    let deleted = engine.delete_workout(user, workout_id).unwrap();
    assert_eq!(deleted.xp_deducted, 0);
    assert!(deleted.attributes.is_zero());

    let after = engine.stats(user).unwrap();
    assert_eq!(after.xp_total, before.xp_total);
    // Anchored on yesterday, the streak survives
    assert_eq!(after.streak_days, 2);
}

#[test]
fn test_backdated_workout_extends_streak() {
    let (engine, clock, user) = setup();
    clock.set(day(3));

    engine.log_workout(user, day(3), "Run", run()).unwrap();
    assert_eq!(engine.stats(user).unwrap().streak_days, 1);

    engine.log_workout(user, day(2), "Run", run()).unwrap();
    engine.log_workout(user, day(1), "Run", run()).unwrap();
    assert_eq!(engine.stats(user).unwrap().streak_days, 3);

    // Tomorrow cannot be logged yet
    assert!(matches!(
        engine.log_workout(user, day(4), "Run", run()),
        Err(ProgressionError::InvalidInput(_))
    ));
    assert_eq!(engine.stats(user).unwrap().streak_days, 3);
}

#[test]
fn test_progress_report_tracks_stats() {
    let (engine, clock, user) = setup();

    for n in 1..=5 {
        clock.set(day(n));
        engine.log_workout(user, day(n), "Bench", bench()).unwrap();
        engine.log_workout(user, day(n), "Run", run()).unwrap();
    }

    let stats = engine.stats(user).unwrap();
    let report = engine.get_progress(user).unwrap();

    assert_eq!(report.xp_total, stats.xp_total);
    assert_eq!(report.streak_days, 5);
    assert_eq!(report.strength_score, stats.attr_strength + 10);
    assert_eq!(report.endurance_score, stats.attr_endurance + 10);
    assert!(report.level >= 2);
    assert!(report.rank >= 1);
    assert!(report.xp_in_level < report.xp_for_next);
}

#[test]
fn test_users_are_isolated() {
    let (engine, _clock, lena) = setup();
    let max = engine.register_user("max").unwrap();

    let logged = engine.log_workout(lena, day(1), "Bench", bench()).unwrap();

    assert_eq!(engine.stats(max).unwrap(), UserStats::default());
    assert!(engine.workouts_on(max, day(1)).unwrap().is_empty());
    assert!(matches!(
        engine.delete_workout(max, logged.workout_id),
        Err(ProgressionError::WorkoutNotFound(_))
    ));
    assert_eq!(engine.find_user("max").unwrap(), Some(max));
    assert_eq!(engine.find_user("nobody").unwrap(), None);
}

#[test]
fn test_concurrent_logging_loses_nothing() {
    let (engine, _clock, user) = setup();
    let first = engine.log_workout(user, day(1), "Run", run()).unwrap().xp_gained;
    let single = engine.log_workout(user, day(1), "Run", run()).unwrap().xp_gained;

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..5 {
                    engine.log_workout(user, day(1), "Run", run()).unwrap();
                }
            });
        }
    });

    // Every run after the first is logged on a 1-day streak
    assert_eq!(engine.stats(user).unwrap().xp_total, first + single * 21);
    assert_eq!(engine.workouts_on(user, day(1)).unwrap().len(), 22);
}
