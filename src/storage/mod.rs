//! Storage module for database and configuration.

pub mod config;
pub mod database;
pub mod progress_store;
pub mod schema;

pub use config::{AppConfig, ConfigError, DatabaseSettings, LevelingSettings, LoggingSettings};
pub use database::{Database, DatabaseError};
pub use progress_store::{ProgressStore, User, UserProfile};
