use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gf_cli::commands::{
    check, insights, log, mood, patterns, predict, scan_menu, sensitivity, status, summary,
};
use gf_cli::{Cli, Commands, Config, LogEntry};

/// Load and validate config, ensuring the database directory exists.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    config
        .analysis
        .validate()
        .context("invalid analysis configuration")?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Ok(config)
}

/// Load config and open database.
fn open_database(config_path: Option<&Path>) -> Result<(gf_db::Database, Config)> {
    let config = load_config(config_path)?;
    let db = gf_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Log { entry }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            match entry {
                LogEntry::Meal(args) => {
                    log::meal(&mut out, &mut db, &config, args, Utc::now())?;
                }
                LogEntry::Symptom(args) => {
                    log::symptom(&mut out, &mut db, args, Utc::now())?;
                }
            }
        }
        Some(Commands::Mood { meal_id, mood: label }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            mood::run(&mut out, &mut db, meal_id, *label)?;
        }
        Some(Commands::Delete { meal_id }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            mood::delete(&mut out, &mut db, meal_id)?;
        }
        Some(Commands::Summary { json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            summary::run(&mut out, &db, *json)?;
        }
        Some(Commands::Sensitivity { json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            sensitivity::run(&mut out, &db, &config.analysis.correlation, *json)?;
        }
        Some(Commands::Patterns { json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            patterns::run(&mut out, &db, &config.analysis.temporal, *json)?;
        }
        Some(Commands::Insights { json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            insights::run(&mut out, &db, &config.analysis, *json)?;
        }
        Some(Commands::Predict { food, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            predict::run(&mut out, &db, food, *json)?;
        }
        Some(Commands::Check { item, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            check::run(&mut out, &db, &config, item, *json)?;
        }
        Some(Commands::ScanMenu { json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let raw_text =
                std::io::read_to_string(std::io::stdin()).context("failed to read menu text")?;
            scan_menu::run(&mut out, &db, &config, &raw_text, *json)?;
        }
        Some(Commands::Status) => {
            let config = load_config(cli.config.as_deref())?;
            status::run(&mut out, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
