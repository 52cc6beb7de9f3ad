//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gf_core::{MealId, MoodLabel, SymptomType};

/// Gut feeling: food, mood and symptom journal.
///
/// Logs what you eat and how you feel afterwards, then surfaces trigger foods,
/// safe foods, weekly patterns and nutrient shortfalls.
#[derive(Debug, Parser)]
#[command(name = "gf", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a meal or a symptom.
    Log {
        #[command(subcommand)]
        entry: LogEntry,
    },

    /// Attach a mood to a logged meal.
    Mood {
        /// ID printed when the meal was logged.
        meal_id: MealId,

        /// very_bad, bad, neutral, good or feel_ok.
        mood: MoodLabel,
    },

    /// Delete a logged meal. Symptoms linked to it are kept.
    Delete {
        /// ID printed when the meal was logged.
        meal_id: MealId,
    },

    /// Weekly totals, streak and per-mood nutrient averages.
    Summary {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Trigger foods, safe foods and symptom links.
    Sensitivity {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Hardest weekdays and hours of the day.
    Patterns {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// What you should know right now.
    Insights {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Predict how a food will make you feel.
    Predict {
        /// Food name, matched as a case-insensitive substring.
        food: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check a dish against your trigger foods and allergens.
    Check {
        /// Dish or food name.
        item: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check every dish in menu text read from stdin.
    ScanMenu {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show database location and record counts.
    Status,
}

/// Things that can be logged.
#[derive(Debug, Subcommand)]
pub enum LogEntry {
    /// Record a meal.
    Meal(MealArgs),

    /// Record a symptom.
    Symptom(SymptomArgs),
}

#[derive(Debug, Args)]
pub struct MealArgs {
    /// What you ate.
    #[arg(long)]
    pub food: String,

    /// Calories (kcal).
    #[arg(long)]
    pub calories: u32,

    /// Protein in grams.
    #[arg(long, default_value_t = 0.0)]
    pub protein: f64,

    /// Carbohydrates in grams.
    #[arg(long, default_value_t = 0.0)]
    pub carbs: f64,

    /// Fats in grams.
    #[arg(long, default_value_t = 0.0)]
    pub fats: f64,

    /// How you felt afterwards. Can also be added later with `gf mood`.
    #[arg(long)]
    pub mood: Option<MoodLabel>,

    /// When you ate (e.g., 2026-03-02T08:30:00Z or "2 hours ago"). Default: now.
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Debug, Args)]
pub struct SymptomArgs {
    /// Symptom type (bloating, cramps, gas, nausea, heartburn, ...).
    #[arg(long)]
    pub kind: SymptomType,

    /// Intensity from 1 (mild) to 5 (severe).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub intensity: u8,

    /// Hours between the meal and the symptom.
    #[arg(long, default_value_t = 0.0)]
    pub hours_after: f64,

    /// ID of the meal the symptom followed.
    #[arg(long)]
    pub meal: Option<MealId>,

    /// When the symptom started. Default: now.
    #[arg(long)]
    pub at: Option<String>,
}
