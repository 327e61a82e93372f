//! Database schema definitions for Muscle Up.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- Physical profile, read by the calculators
CREATE TABLE IF NOT EXISTS user_profile (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    bodyweight_kg REAL NOT NULL DEFAULT 0,
    height_cm REAL NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
);

-- Progression stats, written only by the progression engine
CREATE TABLE IF NOT EXISTS user_stats (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    xp_total INTEGER NOT NULL DEFAULT 0 CHECK (xp_total >= 0),
    streak_days INTEGER NOT NULL DEFAULT 0 CHECK (streak_days >= 0),
    attr_strength INTEGER NOT NULL DEFAULT 0 CHECK (attr_strength >= 0),
    attr_endurance INTEGER NOT NULL DEFAULT 0 CHECK (attr_endurance >= 0),
    attr_intelligence INTEGER NOT NULL DEFAULT 0 CHECK (attr_intelligence >= 0),
    updated_at TEXT NOT NULL
);

-- Workouts table
CREATE TABLE IF NOT EXISTS workouts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    exercise TEXT NOT NULL,
    discipline TEXT NOT NULL,
    date TEXT NOT NULL,
    cardio_json TEXT,
    bodyweight_kg REAL NOT NULL DEFAULT 0,
    streak_at_log INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date);

-- At most one rest day per user and date
CREATE UNIQUE INDEX IF NOT EXISTS idx_workouts_one_rest_day
    ON workouts(user_id, date) WHERE discipline = 'restday';

-- Sets of strength and calisthenics workouts
CREATE TABLE IF NOT EXISTS workout_sets (
    workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    set_index INTEGER NOT NULL,
    reps INTEGER,
    weight REAL,
    PRIMARY KEY (workout_id, set_index)
);
"#;

/// Schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
