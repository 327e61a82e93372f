//! Integration tests for state surviving a restart.

use chrono::NaiveDate;
use muscleup::progression::{ManualClock, ProgressionEngine};
use muscleup::storage::config::{load_config_from, save_config};
use muscleup::storage::Database;
use muscleup::workouts::types::{Measurements, SetInput};
use tempfile::TempDir;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, n).unwrap()
}

#[test]
fn test_progress_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("muscleup.db");
    let squats = Measurements::Strength(vec![SetInput::new(5, 100.0); 5]);

    let (user, workout_id, report) = {
        let engine = ProgressionEngine::new(Database::open(&path).unwrap())
            .with_clock(ManualClock::new(day(2)));
        let user = engine.register_user("otto").unwrap();
        engine.set_body_measurements(user, 90.0, None).unwrap();
        engine.log_workout(user, day(1), "Squat", squats.clone()).unwrap();
        let logged = engine.log_workout(user, day(2), "Squat", squats.clone()).unwrap();
        (user, logged.workout_id, engine.get_progress(user).unwrap())
    };

    let engine = ProgressionEngine::new(Database::open(&path).unwrap())
        .with_clock(ManualClock::new(day(2)));
    assert_eq!(engine.get_progress(user).unwrap(), report);
    assert_eq!(engine.profile(user).unwrap().bodyweight_kg, 90.0);

    let stored = engine.workouts_on(user, day(2)).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].measurements, squats);
    assert_eq!(stored[0].bodyweight_kg, 90.0);
    assert_eq!(stored[0].streak_at_log, 1);

    let before = engine.stats(user).unwrap();
    let deleted = engine.delete_workout(user, workout_id).unwrap();
    assert_eq!(engine.stats(user).unwrap().xp_total, before.xp_total - deleted.xp_deducted);
}

#[test]
fn test_configured_curve_is_used() {
    let dir = TempDir::new().unwrap();
    let mut config = load_config_from(dir.path()).unwrap();
    config.leveling.base_xp = 30;
    save_config(&config).unwrap();

    let config = load_config_from(dir.path()).unwrap();
    let engine = ProgressionEngine::new(Database::open(&config.database_path()).unwrap())
        .with_curve(config.leveling.curve().unwrap())
        .with_clock(ManualClock::new(day(1)));
    let user = engine.register_user("pia").unwrap();

    let pushups = Measurements::Calisthenics(vec![SetInput::reps_only(10)]);
    engine.log_workout(user, day(1), "Push-ups", pushups).unwrap();

    // 30 XP clears level 1 on this curve
    let report = engine.get_progress(user).unwrap();
    assert_eq!(report.xp_total, 30);
    assert_eq!(report.level, 2);
}
