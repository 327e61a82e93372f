//! Unit tests for streak computation.

use chrono::NaiveDate;
use muscleup::progression::streak::{compute_streak, ActivityDay};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, n).unwrap()
}

fn training(days: &[u32]) -> Vec<ActivityDay> {
    days.iter().map(|&n| ActivityDay::training(day(n))).collect()
}

#[test]
fn test_empty_history() {
    assert_eq!(compute_streak(&[], day(10)), 0);
}

#[test]
fn test_consecutive_days_up_to_today() {
    assert_eq!(compute_streak(&training(&[8, 9, 10]), day(10)), 3);
}

#[test]
fn test_anchor_on_yesterday_still_counts() {
    assert_eq!(compute_streak(&training(&[7, 8, 9]), day(10)), 3);
}

#[test]
fn test_stale_history_breaks_streak() {
    assert_eq!(compute_streak(&training(&[6, 7, 8]), day(10)), 0);
}

#[test]
fn test_gap_stops_chain() {
    assert_eq!(compute_streak(&training(&[3, 4, 6, 9, 10]), day(10)), 2);
}

#[test]
fn test_unsorted_and_duplicate_days() {
    let days = training(&[10, 8, 9, 10, 9]);
    assert_eq!(compute_streak(&days, day(10)), 3);
}

#[test]
fn test_rest_day_bridges_without_counting() {
    let mut days = training(&[7, 8, 10]);
    days.push(ActivityDay::rest(day(9)));
    assert_eq!(compute_streak(&days, day(10)), 3);
}

#[test]
fn test_rest_day_anchor() {
    let mut days = training(&[8, 9]);
    days.push(ActivityDay::rest(day(10)));
    assert_eq!(compute_streak(&days, day(10)), 2);
}

#[test]
fn test_training_and_rest_on_same_day_counts_as_training() {
    let mut days = training(&[9, 10]);
    days.push(ActivityDay::rest(day(10)));
    assert_eq!(compute_streak(&days, day(10)), 2);
}

#[test]
fn test_future_days_ignored() {
    assert_eq!(compute_streak(&training(&[9, 10, 11, 12]), day(10)), 2);
    assert_eq!(compute_streak(&training(&[12, 13]), day(10)), 0);
}

#[test]
fn test_streak_across_month_boundary() {
    let days = vec![
        ActivityDay::training(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()),
        ActivityDay::training(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
        ActivityDay::training(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
    ];
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(compute_streak(&days, today), 3);
}
