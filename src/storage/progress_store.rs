//! Progression data storage operations.
//!
//! Provides persistence for:
//! - Users and their physical profile
//! - Progression stats (XP, streak, attributes)
//! - Workouts with their sets
//!
//! The store borrows a plain [`Connection`], so it works the same on a
//! database handle and inside a [`rusqlite::Transaction`].

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::progression::stats::UserStats;
use crate::progression::streak::ActivityDay;
use crate::storage::database::DatabaseError;
use crate::workouts::types::{CardioInput, Discipline, LoggedWorkout, Measurements, SetInput};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Physical profile of a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    /// Bodyweight in kilograms, 0 when unknown
    pub bodyweight_kg: f64,
    /// Height in centimeters, 0 when unknown
    pub height_cm: f64,
    pub updated_at: DateTime<Utc>,
}

/// Store for users, stats and workouts.
pub struct ProgressStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProgressStore<'a> {
    /// Create a new progress store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ========== User Operations ==========

    /// Insert a user together with an empty profile and zeroed stats.
    pub fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let created_at = user.created_at.to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)",
                params![user.id.to_string(), user.username, created_at],
            )
            .map_err(DatabaseError::from_query)?;

        self.conn
            .execute(
                "INSERT INTO user_profile (user_id, bodyweight_kg, height_cm, updated_at)
                 VALUES (?1, 0, 0, ?2)",
                params![user.id.to_string(), created_at],
            )
            .map_err(DatabaseError::from_query)?;

        self.conn
            .execute(
                "INSERT INTO user_stats (user_id, xp_total, streak_days, attr_strength,
                                         attr_endurance, attr_intelligence, updated_at)
                 VALUES (?1, 0, 0, 0, 0, 0, ?2)",
                params![user.id.to_string(), created_at],
            )
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: &Uuid) -> Result<Option<User>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(DatabaseError::from_query)?;

        row.map(|(id, username, created_at)| {
            Ok(User {
                id: parse_uuid(&id)?,
                username,
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .transpose()
    }

    /// Get a user by username.
    pub fn find_user_by_name(&self, username: &str) -> Result<Option<Uuid>, DatabaseError> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from_query)?;

        id.as_deref().map(parse_uuid).transpose()
    }

    // ========== Profile Operations ==========

    /// Get the physical profile of a user.
    pub fn get_profile(&self, user_id: &Uuid) -> Result<Option<UserProfile>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT bodyweight_kg, height_cm, updated_at FROM user_profile WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(DatabaseError::from_query)?;

        row.map(|(bodyweight_kg, height_cm, updated_at)| {
            Ok(UserProfile {
                user_id: *user_id,
                bodyweight_kg,
                height_cm,
                updated_at: parse_timestamp(&updated_at)?,
            })
        })
        .transpose()
    }

    /// Update a profile. Returns false if the user has no profile row.
    pub fn update_profile(&self, profile: &UserProfile) -> Result<bool, DatabaseError> {
        let updated = self
            .conn
            .execute(
                "UPDATE user_profile SET bodyweight_kg = ?2, height_cm = ?3, updated_at = ?4
                 WHERE user_id = ?1",
                params![
                    profile.user_id.to_string(),
                    profile.bodyweight_kg,
                    profile.height_cm,
                    profile.updated_at.to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::from_query)?;

        Ok(updated > 0)
    }

    // ========== Stats Operations ==========

    /// Get the progression stats of a user.
    pub fn get_stats(&self, user_id: &Uuid) -> Result<Option<UserStats>, DatabaseError> {
        self.conn
            .query_row(
                "SELECT xp_total, streak_days, attr_strength, attr_endurance, attr_intelligence
                 FROM user_stats WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok(UserStats {
                        xp_total: row.get(0)?,
                        streak_days: row.get(1)?,
                        attr_strength: row.get(2)?,
                        attr_endurance: row.get(3)?,
                        attr_intelligence: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(DatabaseError::from_query)
    }

    /// Overwrite the progression stats of a user.
    pub fn save_stats(&self, user_id: &Uuid, stats: &UserStats) -> Result<(), DatabaseError> {
        let updated = self
            .conn
            .execute(
                "UPDATE user_stats SET xp_total = ?2, streak_days = ?3, attr_strength = ?4,
                        attr_endurance = ?5, attr_intelligence = ?6, updated_at = ?7
                 WHERE user_id = ?1",
                params![
                    user_id.to_string(),
                    stats.xp_total,
                    stats.streak_days,
                    stats.attr_strength,
                    stats.attr_endurance,
                    stats.attr_intelligence,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::from_query)?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(format!("stats for user {}", user_id)));
        }
        Ok(())
    }

    // ========== Workout Operations ==========

    /// Insert a workout and its sets.
    pub fn insert_workout(&self, workout: &LoggedWorkout) -> Result<(), DatabaseError> {
        let cardio_json = match &workout.measurements {
            Measurements::Cardio(input) => Some(
                serde_json::to_string(input)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            ),
            _ => None,
        };

        self.conn
            .execute(
                "INSERT INTO workouts (id, user_id, exercise, discipline, date, cardio_json,
                                       bodyweight_kg, streak_at_log, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    workout.id.to_string(),
                    workout.user_id.to_string(),
                    workout.exercise,
                    workout.discipline().as_str(),
                    workout.date.format(DATE_FORMAT).to_string(),
                    cardio_json,
                    workout.bodyweight_kg,
                    workout.streak_at_log,
                    workout.created_at.to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::from_query)?;

        let mut stmt = self
            .conn
            .prepare(
                "INSERT INTO workout_sets (workout_id, set_index, reps, weight)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(DatabaseError::from_query)?;

        for (index, set) in workout.measurements.sets().iter().enumerate() {
            stmt.execute(params![
                workout.id.to_string(),
                index as i64,
                set.reps,
                set.weight,
            ])
            .map_err(DatabaseError::from_query)?;
        }

        Ok(())
    }

    /// Get a workout owned by the given user.
    pub fn get_workout(
        &self,
        user_id: &Uuid,
        workout_id: &Uuid,
    ) -> Result<Option<LoggedWorkout>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, exercise, discipline, date, cardio_json,
                        bodyweight_kg, streak_at_log, created_at
                 FROM workouts WHERE id = ?1 AND user_id = ?2",
                params![workout_id.to_string(), user_id.to_string()],
                map_workout_row,
            )
            .optional()
            .map_err(DatabaseError::from_query)?;

        match row {
            Some(row) => {
                let sets = self.get_sets(workout_id)?;
                Ok(Some(row.into_workout(sets)?))
            }
            None => Ok(None),
        }
    }

    /// Delete a workout owned by the given user. Sets go with it.
    pub fn delete_workout(&self, user_id: &Uuid, workout_id: &Uuid) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM workouts WHERE id = ?1 AND user_id = ?2",
                params![workout_id.to_string(), user_id.to_string()],
            )
            .map_err(DatabaseError::from_query)?;

        Ok(deleted > 0)
    }

    /// List workouts of a user, newest day first, optionally for one date.
    pub fn list_workouts(
        &self,
        user_id: &Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<LoggedWorkout>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, exercise, discipline, date, cardio_json,
                        bodyweight_kg, streak_at_log, created_at
                 FROM workouts
                 WHERE user_id = ?1 AND (?2 IS NULL OR date = ?2)
                 ORDER BY date DESC, created_at ASC, rowid ASC",
            )
            .map_err(DatabaseError::from_query)?;

        let date = date.map(|d| d.format(DATE_FORMAT).to_string());
        let rows = stmt
            .query_map(params![user_id.to_string(), date], map_workout_row)
            .map_err(DatabaseError::from_query)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from_query)?;

        let mut workouts = Vec::with_capacity(rows.len());
        for row in rows {
            let id = parse_uuid(&row.id)?;
            let sets = self.get_sets(&id)?;
            workouts.push(row.into_workout(sets)?);
        }

        Ok(workouts)
    }

    /// Distinct workout dates of a user, newest first.
    pub fn activity_days(&self, user_id: &Uuid) -> Result<Vec<ActivityDay>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT date, MIN(discipline = 'restday')
                 FROM workouts WHERE user_id = ?1
                 GROUP BY date ORDER BY date DESC",
            )
            .map_err(DatabaseError::from_query)?;

        let rows = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
            })
            .map_err(DatabaseError::from_query)?;

        let mut days = Vec::new();
        for row in rows {
            let (date, rest_only) = row.map_err(DatabaseError::from_query)?;
            days.push(ActivityDay {
                date: parse_date(&date)?,
                rest_only,
            });
        }

        Ok(days)
    }

    /// Whether the user has a rest day logged on `date`.
    pub fn has_rest_day(&self, user_id: &Uuid, date: NaiveDate) -> Result<bool, DatabaseError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM workouts
                               WHERE user_id = ?1 AND date = ?2 AND discipline = ?3)",
                params![
                    user_id.to_string(),
                    date.format(DATE_FORMAT).to_string(),
                    Discipline::RestDay.as_str(),
                ],
                |row| row.get(0),
            )
            .map_err(DatabaseError::from_query)
    }

    fn get_sets(&self, workout_id: &Uuid) -> Result<Vec<SetInput>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT reps, weight FROM workout_sets
                 WHERE workout_id = ?1 ORDER BY set_index",
            )
            .map_err(DatabaseError::from_query)?;

        let rows = stmt
            .query_map(params![workout_id.to_string()], |row| {
                Ok(SetInput {
                    reps: row.get(0)?,
                    weight: row.get(1)?,
                })
            })
            .map_err(DatabaseError::from_query)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from_query)
    }
}

/// Intermediate struct for reading workout rows from database.
struct WorkoutRow {
    id: String,
    user_id: String,
    exercise: String,
    discipline: String,
    date: String,
    cardio_json: Option<String>,
    bodyweight_kg: f64,
    streak_at_log: u32,
    created_at: String,
}

fn map_workout_row(row: &rusqlite::Row) -> rusqlite::Result<WorkoutRow> {
    Ok(WorkoutRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        exercise: row.get(2)?,
        discipline: row.get(3)?,
        date: row.get(4)?,
        cardio_json: row.get(5)?,
        bodyweight_kg: row.get(6)?,
        streak_at_log: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl WorkoutRow {
    fn into_workout(self, sets: Vec<SetInput>) -> Result<LoggedWorkout, DatabaseError> {
        let discipline = Discipline::from_str(&self.discipline).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Unknown discipline: {}", self.discipline))
        })?;

        let measurements = match discipline {
            Discipline::Strength => Measurements::Strength(sets),
            Discipline::Calisthenics => Measurements::Calisthenics(sets),
            Discipline::RestDay => Measurements::RestDay,
            Discipline::Cardio => {
                let json = self.cardio_json.ok_or_else(|| {
                    DatabaseError::DeserializationError(format!(
                        "Cardio workout {} has no activity data",
                        self.id
                    ))
                })?;
                let input: CardioInput = serde_json::from_str(&json)
                    .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;
                Measurements::Cardio(input)
            }
        };

        Ok(LoggedWorkout {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            exercise: self.exercise,
            date: parse_date(&self.date)?,
            measurements,
            bodyweight_kg: self.bodyweight_kg,
            streak_at_log: self.streak_at_log,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid UUID: {}", e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid date {}: {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid timestamp {}: {}", s, e)))
}
