//! Integration test modules.

mod engine_test;
mod persistence_test;
