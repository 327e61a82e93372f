//! Workout type definitions.
//!
//! A workout is one logged training entry: a strength or calisthenics session
//! made of sets, a single cardio activity, or a rest-day placeholder.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Exercise name stored on rest-day rows.
pub const REST_DAY_EXERCISE: &str = "Restday";

/// Training discipline of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Strength,
    Cardio,
    Calisthenics,
    #[serde(rename = "restday")]
    RestDay,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Strength => "strength",
            Discipline::Cardio => "cardio",
            Discipline::Calisthenics => "calisthenics",
            Discipline::RestDay => "restday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "strength" => Some(Discipline::Strength),
            "cardio" => Some(Discipline::Cardio),
            "calisthenics" => Some(Discipline::Calisthenics),
            "restday" => Some(Discipline::RestDay),
            _ => None,
        }
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged set.
///
/// Values arrive from loosely typed request payloads, so both fields are
/// parsed leniently: numbers and numeric strings are accepted, anything else
/// becomes `None` and the set is later skipped by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetInput {
    /// Repetitions performed
    #[serde(default, deserialize_with = "lenient_reps")]
    pub reps: Option<u32>,
    /// Load in kilograms (bodyweight at logging time for calisthenics)
    #[serde(default, deserialize_with = "lenient_weight")]
    pub weight: Option<f64>,
}

impl SetInput {
    /// Create a set from known numbers.
    pub fn new(reps: u32, weight: f64) -> Self {
        Self {
            reps: Some(reps),
            weight: weight.is_finite().then_some(weight),
        }
    }

    /// Create a set without an external load.
    pub fn reps_only(reps: u32) -> Self {
        Self {
            reps: Some(reps),
            weight: None,
        }
    }

    /// Repetitions, if present and at least one.
    pub fn valid_reps(&self) -> Option<u32> {
        self.reps.filter(|&r| r >= 1)
    }

    /// Weight, if present, finite and non-negative.
    pub fn valid_weight(&self) -> Option<f64> {
        self.weight.filter(|w| w.is_finite() && *w >= 0.0)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn lenient_reps<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

fn lenient_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(deserializer)
}

/// A single cardio activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardioInput {
    Running { duration_min: f64, distance_km: f64 },
    Swimming { duration_min: f64, distance_km: f64 },
    TeamSport { duration_min: f64, sport: String },
}

impl CardioInput {
    /// Build an activity from a free-form activity name.
    ///
    /// Running and swimming are recognised in English and German; every other
    /// name is treated as a team sport and the distance is ignored.
    pub fn from_activity(name: &str, duration_min: f64, distance_km: Option<f64>) -> Self {
        let distance_km = distance_km.unwrap_or(0.0);
        match name.trim().to_lowercase().as_str() {
            "running" | "run" | "laufen" | "joggen" => CardioInput::Running {
                duration_min,
                distance_km,
            },
            "swimming" | "swim" | "schwimmen" => CardioInput::Swimming {
                duration_min,
                distance_km,
            },
            _ => CardioInput::TeamSport {
                duration_min,
                sport: name.trim().to_string(),
            },
        }
    }

    pub fn duration_min(&self) -> f64 {
        match self {
            CardioInput::Running { duration_min, .. }
            | CardioInput::Swimming { duration_min, .. }
            | CardioInput::TeamSport { duration_min, .. } => *duration_min,
        }
    }

    /// The same activity with a missing, negative or non-finite distance
    /// stored as 0.
    pub fn normalized(self) -> Self {
        let clean = |d: f64| if d.is_finite() && d > 0.0 { d } else { 0.0 };
        match self {
            CardioInput::Running {
                duration_min,
                distance_km,
            } => CardioInput::Running {
                duration_min,
                distance_km: clean(distance_km),
            },
            CardioInput::Swimming {
                duration_min,
                distance_km,
            } => CardioInput::Swimming {
                duration_min,
                distance_km: clean(distance_km),
            },
            other => other,
        }
    }

    /// Display label of the activity.
    pub fn label(&self) -> &str {
        match self {
            CardioInput::Running { .. } => "Running",
            CardioInput::Swimming { .. } => "Swimming",
            CardioInput::TeamSport { sport, .. } => sport,
        }
    }
}

/// Raw measurements of a workout, shaped by its discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "discipline", content = "data", rename_all = "lowercase")]
pub enum Measurements {
    Strength(Vec<SetInput>),
    Cardio(CardioInput),
    Calisthenics(Vec<SetInput>),
    #[serde(rename = "restday")]
    RestDay,
}

impl Measurements {
    pub fn discipline(&self) -> Discipline {
        match self {
            Measurements::Strength(_) => Discipline::Strength,
            Measurements::Cardio(_) => Discipline::Cardio,
            Measurements::Calisthenics(_) => Discipline::Calisthenics,
            Measurements::RestDay => Discipline::RestDay,
        }
    }

    /// Sets of a strength or calisthenics workout (empty otherwise).
    pub fn sets(&self) -> &[SetInput] {
        match self {
            Measurements::Strength(sets) | Measurements::Calisthenics(sets) => sets,
            Measurements::Cardio(_) | Measurements::RestDay => &[],
        }
    }
}

/// A workout as stored for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedWorkout {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Exercise or activity name
    pub exercise: String,
    /// Calendar day the workout counts for
    pub date: NaiveDate,
    /// Raw measurements
    pub measurements: Measurements,
    /// Bodyweight in kg when logged (0 = unknown)
    pub bodyweight_kg: f64,
    /// Streak in days when logged
    pub streak_at_log: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl LoggedWorkout {
    pub fn discipline(&self) -> Discipline {
        self.measurements.discipline()
    }

    pub fn is_rest_day(&self) -> bool {
        self.discipline() == Discipline::RestDay
    }
}

/// All workouts of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub workouts: Vec<LoggedWorkout>,
}

/// Group workouts by date, newest day first.
///
/// Workouts keep their relative order within a day.
pub fn group_by_day(workouts: Vec<LoggedWorkout>) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = Vec::new();

    for workout in workouts {
        match days.iter_mut().find(|d| d.date == workout.date) {
            Some(day) => day.workouts.push(workout),
            None => days.push(CalendarDay {
                date: workout.date,
                workouts: vec![workout],
            }),
        }
    }

    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}
