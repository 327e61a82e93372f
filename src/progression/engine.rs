//! Progression engine.
//!
//! The only stateful part of the progression system. Every mutating
//! operation runs as one SQLite transaction behind a single writer lock:
//! the workout row, the stat deltas and the recomputed streak are committed
//! together or not at all.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::leveling::{rank, LevelCurve};
use super::restday::{RestDayDenial, RestDayState};
use super::stats::UserStats;
use super::streak::compute_streak;
use crate::storage::{Database, DatabaseError, ProgressStore, User, UserProfile};
use crate::workouts::types::{
    group_by_day, CalendarDay, LoggedWorkout, Measurements, SetInput, REST_DAY_EXERCISE,
};
use crate::xp::{self, AttributeDelta, CalcContext, Direction, XpOutcome};

/// Result of logging a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutLogged {
    pub workout_id: Uuid,
    pub xp_gained: u32,
    pub attributes: AttributeDelta,
}

/// Result of deleting a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutDeleted {
    pub xp_deducted: u32,
    pub attributes: AttributeDelta,
}

/// Result of a rest-day request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestDayOutcome {
    Logged { workout_id: Uuid },
    Declined { denial: RestDayDenial },
}

impl RestDayOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, RestDayOutcome::Logged { .. })
    }
}

/// Everything the profile page shows about a user's progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressReport {
    pub xp_total: u32,
    pub level: u32,
    pub progress: f64,
    pub xp_for_next: u32,
    pub xp_in_level: u32,
    pub rank: u8,
    pub strength_score: u32,
    pub endurance_score: u32,
    pub intelligence: u32,
    pub streak_days: u32,
}

impl ProgressReport {
    fn from_stats(stats: &UserStats, curve: &LevelCurve) -> Self {
        let level = curve.progress(stats.xp_total);
        Self {
            xp_total: stats.xp_total,
            level: level.level,
            progress: level.progress,
            xp_for_next: level.xp_for_next,
            xp_in_level: level.xp_in_level,
            rank: rank(level.level),
            strength_score: stats.strength_score(),
            endurance_score: stats.endurance_score(),
            intelligence: stats.attr_intelligence,
            streak_days: stats.streak_days,
        }
    }

    /// Report for a user without a stats record.
    fn empty(curve: &LevelCurve) -> Self {
        Self {
            rank: 0,
            ..Self::from_stats(&UserStats::default(), curve)
        }
    }
}

/// Applies workouts to user stats.
pub struct ProgressionEngine {
    db: Mutex<Database>,
    curve: LevelCurve,
    clock: Box<dyn Clock>,
}

impl ProgressionEngine {
    /// Create an engine on the default level curve and the system clock.
    pub fn new(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            curve: LevelCurve::default(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_curve(mut self, curve: LevelCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ========== Users ==========

    /// Register a user with an empty profile and zeroed stats.
    pub fn register_user(&self, username: &str) -> Result<Uuid, ProgressionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ProgressionError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };

        self.write(|store, _| match store.insert_user(&user) {
            Ok(()) => Ok(()),
            Err(DatabaseError::ConstraintViolation(_)) => {
                Err(ProgressionError::UsernameTaken(user.username.clone()))
            }
            Err(e) => Err(e.into()),
        })?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(user.id)
    }

    /// Look up a user id by username.
    pub fn find_user(&self, username: &str) -> Result<Option<Uuid>, ProgressionError> {
        self.read(|store| Ok(store.find_user_by_name(username.trim())?))
    }

    /// Get the physical profile of a user.
    pub fn profile(&self, user_id: Uuid) -> Result<UserProfile, ProgressionError> {
        self.read(|store| {
            store
                .get_profile(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))
        })
    }

    /// Update bodyweight and optionally height. 0 means unknown.
    ///
    /// Already logged workouts keep the bodyweight they were logged with.
    pub fn set_body_measurements(
        &self,
        user_id: Uuid,
        bodyweight_kg: f64,
        height_cm: Option<f64>,
    ) -> Result<(), ProgressionError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(bodyweight_kg) || !height_cm.map_or(true, valid) {
            return Err(ProgressionError::InvalidInput(
                "bodyweight and height must be non-negative numbers".to_string(),
            ));
        }

        self.write(|store, _| {
            let mut profile = store
                .get_profile(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))?;
            profile.bodyweight_kg = bodyweight_kg;
            if let Some(height) = height_cm {
                profile.height_cm = height;
            }
            profile.updated_at = Utc::now();
            store.update_profile(&profile)?;
            Ok(())
        })?;

        tracing::info!("Updated body measurements of user {}", user_id);
        Ok(())
    }

    // ========== Workouts ==========

    /// Log a strength, cardio or calisthenics workout and award its XP.
    pub fn log_workout(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        exercise: &str,
        measurements: Measurements,
    ) -> Result<WorkoutLogged, ProgressionError> {
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(ProgressionError::InvalidInput(
                "exercise name must not be empty".to_string(),
            ));
        }
        match &measurements {
            Measurements::RestDay => {
                return Err(ProgressionError::InvalidInput(
                    "rest days are logged with log_restday".to_string(),
                ))
            }
            Measurements::Strength(sets) | Measurements::Calisthenics(sets) if sets.is_empty() => {
                return Err(ProgressionError::InvalidInput(
                    "a workout needs at least one set".to_string(),
                ))
            }
            Measurements::Cardio(input) if !input.duration_min().is_finite() => {
                return Err(ProgressionError::InvalidInput(
                    "cardio duration must be a finite number".to_string(),
                ))
            }
            _ => {}
        }
        // Stored rows must decode again, JSON has no NaN or infinity
        let measurements = match measurements {
            Measurements::Cardio(input) => Measurements::Cardio(input.normalized()),
            other => other,
        };

        let logged = self.write(|store, today| {
            ensure_not_future(date, today)?;
            let mut stats = store
                .get_stats(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))?;
            let bodyweight_kg = store
                .get_profile(&user_id)?
                .map_or(0.0, |p| p.bodyweight_kg);
            // The stored streak may be days old
            let streak_days = recompute_streak(store, user_id, today)?;

            let workout = LoggedWorkout {
                id: Uuid::new_v4(),
                user_id,
                exercise: exercise.to_string(),
                date,
                measurements: with_bodyweight(measurements, bodyweight_kg),
                bodyweight_kg,
                streak_at_log: streak_days,
                created_at: Utc::now(),
            };

            let outcome = workout_outcome(&workout);
            store.insert_workout(&workout)?;

            stats.apply(&outcome, Direction::Add);
            stats.streak_days = recompute_streak(store, user_id, today)?;
            store.save_stats(&user_id, &stats)?;

            tracing::debug!("Workout {} applied: {:?} -> {:?}", workout.id, outcome, stats);

            Ok(WorkoutLogged {
                workout_id: workout.id,
                xp_gained: outcome.xp,
                attributes: outcome.attributes,
            })
        })?;

        tracing::info!(
            "User {} logged {} on {}: +{} XP",
            user_id,
            exercise,
            date,
            logged.xp_gained
        );
        Ok(logged)
    }

    /// Delete a workout and take back exactly what logging it awarded.
    ///
    /// The deduction is recomputed from the stored sets and the bodyweight
    /// and streak snapshotted when the workout was logged.
    pub fn delete_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<WorkoutDeleted, ProgressionError> {
        let deleted = self.write(|store, today| {
            let workout = store
                .get_workout(&user_id, &workout_id)?
                .ok_or(ProgressionError::WorkoutNotFound(workout_id))?;
            let mut stats = store
                .get_stats(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))?;

            let outcome = workout_outcome(&workout);
            stats.apply(&outcome, Direction::Deduct);

            if !store.delete_workout(&user_id, &workout_id)? {
                return Err(ProgressionError::WorkoutNotFound(workout_id));
            }
            stats.streak_days = recompute_streak(store, user_id, today)?;
            store.save_stats(&user_id, &stats)?;

            Ok(WorkoutDeleted {
                xp_deducted: outcome.xp,
                attributes: outcome.attributes,
            })
        })?;

        tracing::info!(
            "User {} deleted workout {}: -{} XP",
            user_id,
            workout_id,
            deleted.xp_deducted
        );
        Ok(deleted)
    }

    /// Workouts of a user on one date.
    pub fn workouts_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<LoggedWorkout>, ProgressionError> {
        self.read(|store| Ok(store.list_workouts(&user_id, Some(date))?))
    }

    /// All workouts of a user grouped by day, newest first.
    pub fn calendar(&self, user_id: Uuid) -> Result<Vec<CalendarDay>, ProgressionError> {
        let workouts = self.read(|store| Ok(store.list_workouts(&user_id, None)?))?;
        Ok(group_by_day(workouts))
    }

    // ========== Streak & rest days ==========

    /// Recompute and persist the streak from the full workout history.
    pub fn update_streak(&self, user_id: Uuid) -> Result<u32, ProgressionError> {
        self.write(|store, today| {
            let mut stats = store
                .get_stats(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))?;
            stats.streak_days = recompute_streak(store, user_id, today)?;
            store.save_stats(&user_id, &stats)?;
            Ok(stats.streak_days)
        })
    }

    /// Why a rest day on `date` would be declined.
    ///
    /// Gates on the streak as of today, derived from the workout history, so
    /// the answer matches what [`Self::log_restday`] would do. Nothing is
    /// written.
    pub fn rest_day_denial(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<RestDayDenial>, ProgressionError> {
        let today = self.clock.today();
        ensure_not_future(date, today)?;
        self.read(|store| {
            let streak_days = recompute_streak(store, user_id, today)?;
            Ok(rest_day_state(store, user_id, date, streak_days)?.denial())
        })
    }

    /// Whether a rest day may be logged on `date`.
    pub fn check_restday(&self, user_id: Uuid, date: NaiveDate) -> Result<bool, ProgressionError> {
        Ok(self.rest_day_denial(user_id, date)?.is_none())
    }

    /// Log a rest day if the user is eligible.
    ///
    /// Declines are reported in the outcome and leave all state untouched.
    pub fn log_restday(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<RestDayOutcome, ProgressionError> {
        let outcome = self.write(|store, today| {
            ensure_not_future(date, today)?;
            let mut stats = store
                .get_stats(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))?;

            // Gate on the fresh streak, the stored one may be days old
            let streak_days = recompute_streak(store, user_id, today)?;
            if let Some(denial) = rest_day_state(store, user_id, date, streak_days)?.denial() {
                return Ok(RestDayOutcome::Declined { denial });
            }

            let bodyweight_kg = store
                .get_profile(&user_id)?
                .map_or(0.0, |p| p.bodyweight_kg);
            let workout = LoggedWorkout {
                id: Uuid::new_v4(),
                user_id,
                exercise: REST_DAY_EXERCISE.to_string(),
                date,
                measurements: Measurements::RestDay,
                bodyweight_kg,
                streak_at_log: streak_days,
                created_at: Utc::now(),
            };
            store.insert_workout(&workout)?;

            stats.streak_days = recompute_streak(store, user_id, today)?;
            store.save_stats(&user_id, &stats)?;

            Ok(RestDayOutcome::Logged {
                workout_id: workout.id,
            })
        })?;

        match &outcome {
            RestDayOutcome::Logged { .. } => {
                tracing::info!("User {} logged a rest day on {}", user_id, date)
            }
            RestDayOutcome::Declined { denial } => {
                tracing::warn!("Rest day for user {} on {} declined: {}", user_id, date, denial)
            }
        }
        Ok(outcome)
    }

    // ========== Progress ==========

    /// Level, rank, scores and streak of a user.
    ///
    /// Unknown users get a level-1 report with rank 0.
    pub fn get_progress(&self, user_id: Uuid) -> Result<ProgressReport, ProgressionError> {
        let stats = self.read(|store| Ok(store.get_stats(&user_id)?))?;
        Ok(match stats {
            Some(stats) => ProgressReport::from_stats(&stats, &self.curve),
            None => ProgressReport::empty(&self.curve),
        })
    }

    /// Raw stored stats of a user.
    pub fn stats(&self, user_id: Uuid) -> Result<UserStats, ProgressionError> {
        self.read(|store| {
            store
                .get_stats(&user_id)?
                .ok_or(ProgressionError::UserNotFound(user_id))
        })
    }

    // ========== Internals ==========

    fn lock(&self) -> Result<MutexGuard<'_, Database>, ProgressionError> {
        self.db.lock().map_err(|_| ProgressionError::LockPoisoned)
    }

    fn read<T>(
        &self,
        op: impl FnOnce(&ProgressStore<'_>) -> Result<T, ProgressionError>,
    ) -> Result<T, ProgressionError> {
        let db = self.lock()?;
        op(&ProgressStore::new(db.connection()))
    }

    /// Run `op` in one transaction. Any error rolls everything back.
    fn write<T>(
        &self,
        op: impl FnOnce(&ProgressStore<'_>, NaiveDate) -> Result<T, ProgressionError>,
    ) -> Result<T, ProgressionError> {
        let today = self.clock.today();
        let mut db = self.lock()?;
        let tx = db.transaction()?;

        let value = op(&ProgressStore::new(&tx), today)?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(value)
    }
}

/// XP and attributes of a stored workout, from its own snapshot.
fn workout_outcome(workout: &LoggedWorkout) -> XpOutcome {
    let ctx = CalcContext {
        bodyweight_kg: workout.bodyweight_kg,
        streak_days: workout.streak_at_log,
    };
    xp::calculate(&workout.measurements, &ctx)
}

/// Calisthenics sets carry the bodyweight they were done at.
fn with_bodyweight(measurements: Measurements, bodyweight_kg: f64) -> Measurements {
    match measurements {
        Measurements::Calisthenics(sets) if bodyweight_kg > 0.0 => Measurements::Calisthenics(
            sets.into_iter()
                .map(|set| SetInput {
                    weight: set.weight.or(Some(bodyweight_kg)),
                    ..set
                })
                .collect(),
        ),
        other => other,
    }
}

fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), ProgressionError> {
    if date > today {
        return Err(ProgressionError::InvalidInput(format!(
            "{} is in the future (today is {})",
            date, today
        )));
    }
    Ok(())
}

fn recompute_streak(
    store: &ProgressStore<'_>,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<u32, ProgressionError> {
    let days = store.activity_days(&user_id)?;
    let streak = compute_streak(&days, today);
    tracing::debug!("Streak of user {} as of {}: {} days", user_id, today, streak);
    Ok(streak)
}

fn rest_day_state(
    store: &ProgressStore<'_>,
    user_id: Uuid,
    date: NaiveDate,
    streak_days: u32,
) -> Result<RestDayState, ProgressionError> {
    let rest_on = |day: Option<NaiveDate>| -> Result<bool, ProgressionError> {
        match day {
            Some(day) => Ok(store.has_rest_day(&user_id, day)?),
            None => Ok(false),
        }
    };

    Ok(RestDayState {
        streak_days,
        rest_on_date: rest_on(Some(date))?,
        rest_on_previous_day: rest_on(date.pred_opt())?,
        rest_on_next_day: rest_on(date.succ_opt())?,
    })
}

/// Progression errors.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Workout not found: {0}")]
    WorkoutNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Progression store lock poisoned")]
    LockPoisoned,
}
