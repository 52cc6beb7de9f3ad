//! Correlation and insight engine for food, mood and symptom logs.
//!
//! This crate contains the domain types and the analyzers built on them:
//! - Statistics: weekly totals, per-mood nutrient averages, logging streaks
//! - Correlation: trigger and safe foods, symptom-to-food links
//! - Temporal patterns: worst weekdays and hours of the day
//! - Deficiencies: protein and calorie shortfalls over recent meals
//! - Matching: safe/caution/avoid verdicts for dishes and menu text
//! - Insights: the ranked summary of all of the above, plus mood prediction
//!
//! Every analyzer is a pure function over slices. Persistence lives behind
//! [`LogStore`]; take a [`Snapshot`] and pass its slices in.

pub mod config;
pub mod correlation;
pub mod deficiency;
pub mod insight;
pub mod log;
pub mod matcher;
pub mod mood;
pub mod stats;
pub mod store;
pub mod temporal;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use config::{AnalysisConfig, ConfigError};
pub use correlation::{
    CorrelationConfig, FoodCorrelation, SensitivityReport, SymptomCorrelation,
    sensitivity_report, symptom_correlations, trigger_foods,
};
pub use deficiency::{DeficiencyConfig, DeficiencyFinding, Nutrient, Severity, detect_deficiencies};
pub use insight::{
    Insight, InsightConfig, InsightKind, MoodPrediction, Prediction, compose_insights,
    predict_mood,
};
pub use log::{MealLog, SymptomLog, SymptomType, UnknownSymptomType};
pub use matcher::{TriggerVerdict, VerdictStatus, classify, extract_candidate_items, scan_menu};
pub use mood::{MoodBucket, MoodLabel, UnknownMood};
pub use stats::{
    NutrientAverages, WeeklySummary, current_streak, nutrient_averages, nutrient_trends_by_mood,
    weekly_summary,
};
pub use store::{LogStore, Snapshot};
pub use temporal::{DayPattern, HourPattern, TemporalConfig, hourly_pattern, worst_days};
pub use types::{Confidence, MealId, SymptomId, ValidationError};
