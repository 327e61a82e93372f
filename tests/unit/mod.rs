//! Unit test modules.

mod calculators_test;
mod leveling_test;
mod streak_test;
