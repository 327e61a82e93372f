//! Muscle Up - gamified training log
//!
//! Command-line entry point. Every command prints its result as JSON.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use muscleup::progression::ProgressionEngine;
use muscleup::storage::config::{load_config, load_config_from, save_config};
use muscleup::storage::Database;
use muscleup::workouts::{CardioInput, Measurements, SetInput};

#[derive(Parser)]
#[command(name = "muscleup")]
#[command(about = "Gamified training log: XP, levels, ranks and streaks")]
#[command(version)]
struct Cli {
    /// Data directory holding config.toml and the database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config.toml with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Register a new user
    Register { username: String },

    /// Set bodyweight (kg) and optionally height (cm)
    Body {
        username: String,
        bodyweight_kg: f64,
        #[arg(long)]
        height_cm: Option<f64>,
    },

    /// Log a strength workout, sets given as REPSxWEIGHT (e.g. 5x80 5x80 3x90)
    Strength {
        username: String,
        exercise: String,
        #[arg(required = true)]
        sets: Vec<String>,
        /// Workout date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log a calisthenics workout, sets given as REPS or REPSxWEIGHT
    Calisthenics {
        username: String,
        exercise: String,
        #[arg(required = true)]
        sets: Vec<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log a cardio activity (running, swimming or any team sport)
    Cardio {
        username: String,
        activity: String,
        duration_min: f64,
        #[arg(long)]
        distance_km: Option<f64>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log a rest day
    Rest {
        username: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Check whether a rest day may be logged
    CheckRest {
        username: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a workout and deduct its XP
    Delete { username: String, workout_id: Uuid },

    /// Recompute the training streak
    Streak { username: String },

    /// Show level, rank, scores and streak
    Progress { username: String },

    /// List workouts of one day, or all days grouped when no date is given
    Workouts {
        username: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.data_dir {
        Some(dir) => load_config_from(dir),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    let default_filter = if cli.verbose {
        "debug"
    } else {
        config.logging.filter.as_str()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting Muscle Up v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Init { force } = cli.command {
        if config.data_dir.join("config.toml").exists() && !force {
            bail!("config.toml already exists in {}", config.data_dir.display());
        }
        save_config(&config)?;
        println!("{}", config.data_dir.join("config.toml").display());
        return Ok(());
    }

    let db = Database::open(&config.database_path())?;
    let engine = ProgressionEngine::new(db).with_curve(config.leveling.curve()?);
    let today = engine.today();

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Register { username } => {
            let id = engine.register_user(&username)?;
            print_json(&serde_json::json!({ "user_id": id }))?;
        }
        Commands::Body {
            username,
            bodyweight_kg,
            height_cm,
        } => {
            let user = lookup(&engine, &username)?;
            engine.set_body_measurements(user, bodyweight_kg, height_cm)?;
            let profile = engine.profile(user)?;
            print_json(&serde_json::json!({
                "bodyweight_kg": profile.bodyweight_kg,
                "height_cm": profile.height_cm,
            }))?;
        }
        Commands::Strength {
            username,
            exercise,
            sets,
            date,
        } => {
            let user = lookup(&engine, &username)?;
            let measurements = Measurements::Strength(parse_sets(&sets)?);
            let logged =
                engine.log_workout(user, date.unwrap_or(today), &exercise, measurements)?;
            print_json(&logged)?;
        }
        Commands::Calisthenics {
            username,
            exercise,
            sets,
            date,
        } => {
            let user = lookup(&engine, &username)?;
            let measurements = Measurements::Calisthenics(parse_sets(&sets)?);
            let logged =
                engine.log_workout(user, date.unwrap_or(today), &exercise, measurements)?;
            print_json(&logged)?;
        }
        Commands::Cardio {
            username,
            activity,
            duration_min,
            distance_km,
            date,
        } => {
            let user = lookup(&engine, &username)?;
            let input = CardioInput::from_activity(&activity, duration_min, distance_km);
            let exercise = input.label().to_string();
            let logged = engine.log_workout(
                user,
                date.unwrap_or(today),
                &exercise,
                Measurements::Cardio(input),
            )?;
            print_json(&logged)?;
        }
        Commands::Rest { username, date } => {
            let user = lookup(&engine, &username)?;
            print_json(&engine.log_restday(user, date.unwrap_or(today))?)?;
        }
        Commands::CheckRest { username, date } => {
            let user = lookup(&engine, &username)?;
            let denial = engine.rest_day_denial(user, date.unwrap_or(today))?;
            print_json(&serde_json::json!({
                "allowed": denial.is_none(),
                "message": denial.map(|d| d.to_string()),
            }))?;
        }
        Commands::Delete {
            username,
            workout_id,
        } => {
            let user = lookup(&engine, &username)?;
            print_json(&engine.delete_workout(user, workout_id)?)?;
        }
        Commands::Streak { username } => {
            let user = lookup(&engine, &username)?;
            print_json(&engine.update_streak(user)?)?;
        }
        Commands::Progress { username } => {
            let user = lookup(&engine, &username)?;
            print_json(&engine.get_progress(user)?)?;
        }
        Commands::Workouts { username, date } => {
            let user = lookup(&engine, &username)?;
            match date {
                Some(date) => print_json(&engine.workouts_on(user, date)?)?,
                None => print_json(&engine.calendar(user)?)?,
            }
        }
    }

    Ok(())
}

fn lookup(engine: &ProgressionEngine, username: &str) -> Result<Uuid> {
    engine
        .find_user(username)?
        .with_context(|| format!("Unknown user: {}", username))
}

/// Parse `REPS` or `REPSxWEIGHT` set arguments.
fn parse_sets(args: &[String]) -> Result<Vec<SetInput>> {
    args.iter()
        .map(|arg| {
            let (reps, weight) = match arg.split_once(['x', 'X']) {
                Some((reps, weight)) => (reps, Some(weight)),
                None => (arg.as_str(), None),
            };
            let reps: u32 = reps
                .trim()
                .parse()
                .with_context(|| format!("Invalid reps in set '{}'", arg))?;
            let weight = weight
                .map(|w| w.trim().replace(',', ".").parse::<f64>())
                .transpose()
                .with_context(|| format!("Invalid weight in set '{}'", arg))?;
            Ok(SetInput {
                reps: Some(reps),
                weight,
            })
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
