//! Ranked, human-readable findings and single-food mood predictions.
//!
//! [`compose_insights`] is the one call a caller needs for "what should the
//! user know right now". It runs every analyzer over the same snapshot and
//! emits at most one insight per analyzer, always in the same order:
//!
//! 1. the most frequent trigger food (warning)
//! 2. the most frequent safe food (suggestion)
//! 3. the single worst weekday (pattern)
//! 4. the first nutrient deficiency (warning)
//! 5. the strongest symptom link to a food (pattern)

use std::fmt;

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::correlation::{
    CorrelationConfig, SymptomCorrelation, sensitivity_report, symptom_correlations,
};
use crate::deficiency::{DeficiencyFinding, detect_deficiencies};
use crate::log::{MealLog, SymptomLog, SymptomType};
use crate::mood::MoodBucket;
use crate::stats::ratio;
use crate::temporal::{weekday_name, worst_days};

/// A good-ratio above this predicts a good outcome.
const GOOD_PREDICTION_RATIO: f64 = 0.7;
/// A good-ratio below this predicts a bad outcome.
const BAD_PREDICTION_RATIO: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Meals required before any insight is composed. Default: 5.
    pub min_meal_logs: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self { min_meal_logs: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Suggestion,
    Pattern,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Warning => "warning",
            Self::Suggestion => "suggestion",
            Self::Pattern => "pattern",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    /// Whether the user can act on it directly, as opposed to just noting it.
    pub actionable: bool,
}

/// Converts a ratio in `[0.0, 1.0]` to a whole percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(ratio: f64) -> u8 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn deficiency_insight(finding: &DeficiencyFinding) -> Insight {
    let unit = finding.nutrient.unit();
    Insight {
        kind: InsightKind::Warning,
        title: format!("Low {}", finding.nutrient),
        message: format!(
            "Your recent meals average {:.0} {unit} of {}, below the {:.0} {unit} target.",
            finding.observed_avg, finding.nutrient, finding.target
        ),
        actionable: true,
    }
}

/// The link with the most occurrences that reaches the symptom trigger
/// threshold. Ties go to the first symptom type, then the first food.
fn strongest_symptom_insight(
    meal_logs: &[MealLog],
    symptom_logs: &[SymptomLog],
    config: &CorrelationConfig,
) -> Option<Insight> {
    let correlations = symptom_correlations(symptom_logs, meal_logs);

    let mut strongest: Option<(SymptomType, &SymptomCorrelation)> = None;
    for (symptom_type, foods) in &correlations {
        for food in foods {
            if food.occurrences < config.symptom_trigger_min_occurrences {
                continue;
            }
            if strongest.is_none_or(|(_, best)| food.occurrences > best.occurrences) {
                strongest = Some((*symptom_type, food));
            }
        }
    }

    strongest.map(|(symptom_type, food)| Insight {
        kind: InsightKind::Pattern,
        title: format!("{} after {}", symptom_type.display_name(), food.food_name),
        message: format!(
            "{} followed {} {} times, about {:.1} hours later at an average intensity of {:.1}/5.",
            symptom_type.display_name(),
            food.food_name,
            food.occurrences,
            food.avg_delay_hours,
            food.avg_intensity
        ),
        actionable: true,
    })
}

/// Composes the current insights, in the fixed order listed in the module docs.
///
/// Returns an empty list when fewer than `insights.min_meal_logs` meals were
/// logged. The caller decides how to ask for more data.
pub fn compose_insights<Tz: TimeZone>(
    meal_logs: &[MealLog],
    symptom_logs: &[SymptomLog],
    tz: &Tz,
    config: &AnalysisConfig,
) -> Vec<Insight> {
    if meal_logs.len() < config.insights.min_meal_logs {
        tracing::debug!(
            meals = meal_logs.len(),
            required = config.insights.min_meal_logs,
            "not enough meals for insights"
        );
        return Vec::new();
    }

    let mut insights = Vec::new();
    let report = sensitivity_report(meal_logs, &config.correlation);

    if let Some(trigger) = report.triggers.first() {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: format!("Possible trigger: {}", trigger.food_name),
            message: format!(
                "{} was followed by a negative mood after {} of {} meals ({}%).",
                trigger.food_name,
                trigger.negative_count,
                trigger.occurrences,
                percent(trigger.negative_ratio)
            ),
            actionable: true,
        });
    }

    if let Some(safe) = report.safe.first() {
        insights.push(Insight {
            kind: InsightKind::Suggestion,
            title: format!("Safe choice: {}", safe.food_name),
            message: format!(
                "{} left you feeling good after {} of {} meals ({}%).",
                safe.food_name,
                safe.positive_count,
                safe.occurrences,
                percent(safe.positive_ratio)
            ),
            actionable: true,
        });
    }

    if let Some(day) = worst_days(meal_logs, tz, &config.temporal).first() {
        let name = weekday_name(day.day);
        insights.push(Insight {
            kind: InsightKind::Pattern,
            title: format!("{name}s are your hardest day"),
            message: format!(
                "{}% of meals logged on a {name} were followed by a negative mood.",
                percent(day.negative_ratio)
            ),
            actionable: false,
        });
    }

    if let Some(finding) = detect_deficiencies(meal_logs, &config.deficiency).first() {
        insights.push(deficiency_insight(finding));
    }

    if let Some(insight) = strongest_symptom_insight(meal_logs, symptom_logs, &config.correlation)
    {
        insights.push(insight);
    }

    tracing::debug!(count = insights.len(), "composed insights");
    insights
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Good,
    Neutral,
    Bad,
    Unknown,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Bad => "bad",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodPrediction {
    pub prediction: Prediction,
    /// 0 to 100.
    pub confidence: u8,
    /// Meals whose food name matched the query, labeled or not.
    pub sample_size: usize,
}

impl MoodPrediction {
    const UNKNOWN: Self = Self {
        prediction: Prediction::Unknown,
        confidence: 0,
        sample_size: 0,
    };
}

/// Predicts how eating `food_name` will feel from past meals that contain it.
///
/// Matching is a case-insensitive substring test against logged food names.
/// Only positive and negative moods form the good-ratio; neutral and unlabeled
/// meals count towards `sample_size` alone. Confidence is how far the
/// good-ratio leans to its side, as a percentage.
pub fn predict_mood(food_name: &str, meal_logs: &[MealLog]) -> MoodPrediction {
    let query = food_name.trim().to_lowercase();
    if query.is_empty() {
        return MoodPrediction::UNKNOWN;
    }

    let mut sample_size = 0;
    let mut positive = 0;
    let mut negative = 0;
    for log in meal_logs
        .iter()
        .filter(|log| log.is_well_formed() && log.food_key().contains(&query))
    {
        sample_size += 1;
        match log.mood.map(|mood| mood.bucket()) {
            Some(MoodBucket::Positive) => positive += 1,
            Some(MoodBucket::Negative) => negative += 1,
            Some(MoodBucket::Neutral) | None => {}
        }
    }

    if sample_size == 0 {
        return MoodPrediction::UNKNOWN;
    }
    if positive + negative == 0 {
        return MoodPrediction {
            prediction: Prediction::Neutral,
            confidence: 0,
            sample_size,
        };
    }

    let good_ratio = ratio(positive, positive + negative);
    let prediction = if good_ratio > GOOD_PREDICTION_RATIO {
        Prediction::Good
    } else if good_ratio < BAD_PREDICTION_RATIO {
        Prediction::Bad
    } else {
        Prediction::Neutral
    };

    MoodPrediction {
        prediction,
        confidence: percent(good_ratio.max(1.0 - good_ratio)),
        sample_size,
    }
}
