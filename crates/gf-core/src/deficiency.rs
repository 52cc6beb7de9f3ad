//! Nutrient shortfall detection over the most recent meals.
//!
//! The window is a count of entries, not a span of days: the latest
//! `window_entries` well-formed meals are averaged no matter how far apart
//! they were logged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::log::MealLog;
use crate::stats::mean;

/// A nutrient the detector can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    Calories,
}

impl Nutrient {
    /// Amount of this nutrient in one meal.
    fn amount(self, log: &MealLog) -> f64 {
        match self {
            Self::Protein => log.protein_grams,
            Self::Calories => f64::from(log.calories),
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Protein => "g",
            Self::Calories => "kcal",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Calories => write!(f, "calories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Flags `nutrient` when its average falls below `below`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRule {
    pub nutrient: Nutrient,
    pub below: f64,
    pub target: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeficiencyConfig {
    /// Number of most recent meals to average. Default: 7.
    pub window_entries: usize,
    /// Rules in reporting order. Default: protein, then calories.
    pub rules: Vec<NutrientRule>,
}

impl Default for DeficiencyConfig {
    fn default() -> Self {
        Self {
            window_entries: 7,
            rules: vec![
                NutrientRule {
                    nutrient: Nutrient::Protein,
                    below: 20.0,
                    target: 50.0,
                    severity: Severity::High,
                },
                NutrientRule {
                    nutrient: Nutrient::Calories,
                    below: 1200.0,
                    target: 2000.0,
                    severity: Severity::Medium,
                },
            ],
        }
    }
}

/// A nutrient whose recent average is under its rule's threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficiencyFinding {
    pub nutrient: Nutrient,
    pub observed_avg: f64,
    pub target: f64,
    pub severity: Severity,
}

/// Checks the latest meals against every rule, in rule order.
///
/// Returns nothing when there are no well-formed meals.
pub fn detect_deficiencies(logs: &[MealLog], config: &DeficiencyConfig) -> Vec<DeficiencyFinding> {
    let mut recent: Vec<&MealLog> = logs.iter().filter(|log| log.is_well_formed()).collect();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent.truncate(config.window_entries);

    if recent.is_empty() {
        return Vec::new();
    }

    config
        .rules
        .iter()
        .filter_map(|rule| {
            let total: f64 = recent.iter().map(|log| rule.nutrient.amount(log)).sum();
            let observed_avg = mean(total, recent.len());
            (observed_avg < rule.below).then(|| DeficiencyFinding {
                nutrient: rule.nutrient,
                observed_avg,
                target: rule.target,
                severity: rule.severity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fixtures::meal;

    fn logged(id: &str, timestamp: &str, calories: u32, protein: f64) -> MealLog {
        let mut log = meal(id, timestamp, "Meal", None).with_macros(protein, 0.0, 0.0);
        log.calories = calories;
        log
    }

    #[test]
    fn empty_slice_emits_nothing() {
        assert!(detect_deficiencies(&[], &DeficiencyConfig::default()).is_empty());
    }

    #[test]
    fn protein_before_calories() {
        let logs = vec![
            logged("a", "2026-03-02T08:00:00Z", 400, 10.0),
            logged("b", "2026-03-02T12:00:00Z", 600, 12.0),
        ];

        let findings = detect_deficiencies(&logs, &DeficiencyConfig::default());

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].nutrient, Nutrient::Protein);
        assert_eq!(findings[0].severity, Severity::High);
        assert!((findings[0].observed_avg - 11.0).abs() < 1e-9);
        assert!((findings[0].target - 50.0).abs() < 1e-9);
        assert_eq!(findings[1].nutrient, Nutrient::Calories);
        assert_eq!(findings[1].severity, Severity::Medium);
        assert!((findings[1].observed_avg - 500.0).abs() < 1e-9);
        assert!((findings[1].target - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn sufficient_intake_emits_nothing() {
        let logs = vec![logged("a", "2026-03-02T08:00:00Z", 1500, 35.0)];
        assert!(detect_deficiencies(&logs, &DeficiencyConfig::default()).is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        let logs = vec![logged("a", "2026-03-02T08:00:00Z", 1200, 20.0)];
        assert!(detect_deficiencies(&logs, &DeficiencyConfig::default()).is_empty());
    }

    #[test]
    fn only_most_recent_entries_count() {
        // Eight meals: the oldest one is protein-poor, the latest seven are fine.
        let mut logs: Vec<MealLog> = (1..=7)
            .map(|day| logged(&format!("m{day}"), &format!("2026-03-0{day}T12:00:00Z"), 1500, 21.0))
            .collect();
        logs.push(logged("old", "2026-02-01T12:00:00Z", 100, 0.0));

        assert!(detect_deficiencies(&logs, &DeficiencyConfig::default()).is_empty());

        let config = DeficiencyConfig {
            window_entries: 8,
            ..DeficiencyConfig::default()
        };
        // (7 * 1500 + 100) / 8 = 1325, (7 * 21) / 8 = 18.375
        let findings = detect_deficiencies(&logs, &config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].nutrient, Nutrient::Protein);
    }

    #[test]
    fn window_ignores_calendar_gaps() {
        // Two meals months apart still form one window.
        let logs = vec![
            logged("a", "2025-11-01T12:00:00Z", 300, 5.0),
            logged("b", "2026-03-01T12:00:00Z", 300, 5.0),
        ];
        let findings = detect_deficiencies(&logs, &DeficiencyConfig::default());
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn malformed_meals_are_skipped() {
        let mut bad = logged("bad", "2026-03-03T12:00:00Z", 0, 0.0);
        bad.protein_grams = f64::NAN;
        let logs = vec![bad, logged("ok", "2026-03-02T12:00:00Z", 1500, 40.0)];
        assert!(detect_deficiencies(&logs, &DeficiencyConfig::default()).is_empty());
    }
}
