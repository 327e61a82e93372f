//! Unit tests for the level curve and rank tiers.

use muscleup::progression::leveling::{level_and_progress, rank, LevelCurve};

#[test]
fn test_level_one_until_base_xp() {
    let progress = level_and_progress(99);
    assert_eq!(progress.level, 1);
    assert_eq!(progress.xp_in_level, 99);
    assert_eq!(progress.xp_for_next, 100);
    assert!((progress.progress - 0.99).abs() < 1e-9);
}

#[test]
fn test_level_boundaries() {
    // 100 to leave level 1, then 150, then 150 * 1.505 rounded up to 230
    let second = level_and_progress(100);
    assert_eq!((second.level, second.xp_in_level, second.xp_for_next), (2, 0, 150));

    let third = level_and_progress(250);
    assert_eq!((third.level, third.xp_in_level, third.xp_for_next), (3, 0, 230));

    let almost_fourth = level_and_progress(479);
    assert_eq!(almost_fourth.level, 3);
    assert_eq!(almost_fourth.xp_in_level, 229);
}

#[test]
fn test_requirements_strictly_increase() {
    let curve = LevelCurve::default();
    let mut previous = 0;
    let mut xp = 0u32;

    for _ in 0..20 {
        let progress = curve.progress(xp);
        assert!(progress.xp_for_next > previous);
        assert_eq!(progress.xp_for_next % 10, 0);
        previous = progress.xp_for_next;
        xp += progress.xp_for_next - progress.xp_in_level;
    }
}

#[test]
fn test_level_is_monotonic_in_xp() {
    let mut last_level = 1;
    for xp in (0..20_000).step_by(37) {
        let level = level_and_progress(xp).level;
        assert!(level >= last_level);
        last_level = level;
    }
}

#[test]
fn test_huge_xp_does_not_overflow() {
    let progress = level_and_progress(u32::MAX);
    assert!(progress.level > 1);
    assert!(progress.xp_in_level < progress.xp_for_next);
}

#[test]
fn test_custom_curve() {
    let curve = LevelCurve::new(50, 2.0, 0.0).unwrap();
    assert_eq!(curve.progress(50).level, 2);
    assert_eq!(curve.progress(150).level, 3);
    assert_eq!(curve.progress(149).xp_for_next, 100);

    assert!(LevelCurve::new(0, 1.5, 0.0).is_err());
    assert!(LevelCurve::new(100, 0.9, 0.0).is_err());
    assert!(LevelCurve::new(100, 1.5, f64::NAN).is_err());
}

#[test]
fn test_rank_tiers() {
    assert_eq!(rank(0), 0);
    assert_eq!(rank(1), 1);
    assert_eq!(rank(5), 1);
    assert_eq!(rank(6), 2);
    assert_eq!(rank(25), 5);
    assert_eq!(rank(46), 10);
    assert_eq!(rank(50), 10);
    assert_eq!(rank(120), 10);
}
