#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use restday_domain::{
    self as domain, Clock, ExerciseLogService, GoalService, MuscleGroupService,
    RecommendationService,
};
use restday_storage::json;
use serde::Serialize;

mod config;
mod goals;
mod replay;

use config::Config;

#[derive(Parser, Debug)]
#[command(version, about = "Restday - Muscle group training recommendations", long_about = None)]
struct Args {
    /// Muscle group catalog (JSON)
    #[arg(short, long, global = true, env = "RESTDAY_CONFIG")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the muscle group catalog
    Catalog,
    /// Replay an exercise log and print the resulting recommendations
    Recommend {
        #[arg(short, long)]
        log: PathBuf,
        /// Evaluation time (RFC 3339), defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Replay an exercise log and print the logged exercises
    History {
        #[arg(short, long)]
        log: PathBuf,
        #[arg(short, long)]
        muscle_group: Option<u32>,
        /// Only show exercises of the last N days
        #[arg(short, long)]
        days: Option<i64>,
        /// Evaluation time (RFC 3339), defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Manage training goals stored in a JSON file
    Goal {
        /// Goals file, created if missing
        #[arg(short, long)]
        goals: PathBuf,
        /// Current time (RFC 3339), defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        #[command(subcommand)]
        command: GoalCommands,
    },
}

#[derive(Subcommand, Debug)]
enum GoalCommands {
    /// Print the goals
    List {
        /// Only show goals that are past their deadline and not reached
        #[arg(long)]
        overdue: bool,
    },
    /// Add a goal, given as JSON with muscleGroupId, type, description, targetValue and deadline
    Create { request: String },
    /// Change a goal, given the changed fields as JSON
    Update { id: u32, request: String },
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(level_filter(args.verbose));

    let config = Config::load(args.config.as_deref())?;
    let catalog = config.catalog().context("invalid configuration")?;

    match args.command {
        Commands::Catalog => {
            print_json(&catalog.iter().map(json::MuscleGroup::from).collect::<Vec<_>>())?;
        }
        Commands::Recommend { log, now } => {
            let now = now.unwrap_or_else(|| domain::SystemClock.now());
            let service = replay::replay(replay::read(&log)?, catalog, now).await?;
            let recommendations = service
                .get_recommendations()
                .await
                .context("failed to get recommendations")?;
            print_json(
                &recommendations
                    .iter()
                    .map(json::Recommendation::from)
                    .collect::<Vec<_>>(),
            )?;
        }
        Commands::History {
            log,
            muscle_group,
            days,
            now,
        } => {
            let now = now.unwrap_or_else(|| domain::SystemClock.now());
            let service = replay::replay(replay::read(&log)?, catalog, now).await?;
            let entries = history(&service, muscle_group.map(domain::MuscleGroupID::from), days)
                .await?;
            print_json(
                &entries
                    .iter()
                    .map(json::ExerciseLogEntry::from)
                    .collect::<Vec<_>>(),
            )?;
        }
        Commands::Goal {
            goals: path,
            now,
            command,
        } => {
            let now = now.unwrap_or_else(|| domain::SystemClock.now());
            let service = replay::service(catalog, now);
            goals::restore(&service, goals::read(&path)?, now).await?;
            match command {
                GoalCommands::List { overdue } => {
                    let listed = goals::list(&service, overdue, now).await?;
                    print_json(&listed.iter().map(json::Goal::from).collect::<Vec<_>>())?;
                }
                GoalCommands::Create { request } => {
                    let goal = goals::create(&service, &request).await?;
                    goals::write(&path, &service.get_goals().await?)?;
                    print_json(&json::Goal::from(&goal))?;
                }
                GoalCommands::Update { id, request } => {
                    let goal = goals::update(&service, id.into(), &request).await?;
                    goals::write(&path, &service.get_goals().await?)?;
                    print_json(&json::Goal::from(&goal))?;
                }
            }
        }
    }

    Ok(())
}

async fn history(
    service: &replay::ReplayService,
    muscle_group: Option<domain::MuscleGroupID>,
    days: Option<i64>,
) -> Result<Vec<domain::ExerciseLogEntry>> {
    if let Some(id) = muscle_group {
        let known = service
            .get_muscle_groups()
            .await
            .context("failed to get muscle groups")?
            .iter()
            .any(|g| g.id == id);
        if !known {
            log::warn!("muscle group {id} is not part of the catalog");
        }
    }

    let entries = match (days, muscle_group) {
        (Some(days), _) => {
            let window = domain::Window::new(days).context("invalid number of days")?;
            service
                .get_recent_exercise_log(window)
                .await
                .context("failed to get exercise log")?
                .into_iter()
                .filter(|e| muscle_group.is_none_or(|id| e.muscle_group_id == id))
                .collect()
        }
        (None, Some(id)) => service
            .get_exercise_log_for_muscle_group(id)
            .await
            .context("failed to get exercise log")?,
        (None, None) => service
            .get_exercise_log()
            .await
            .context("failed to get exercise log")?,
    };

    Ok(entries)
}
