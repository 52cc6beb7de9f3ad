//! Analysis thresholds and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::correlation::CorrelationConfig;
use crate::deficiency::{DeficiencyConfig, Nutrient};
use crate::insight::InsightConfig;
use crate::temporal::TemporalConfig;

/// Errors from [`AnalysisConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("{field} must be within [0.0, 1.0], got {value}")]
    RatioOutOfRange { field: &'static str, value: f64 },

    #[error("{nutrient} rule thresholds must be positive, got {value}")]
    NonPositiveTarget { nutrient: Nutrient, value: f64 },
}

/// Every threshold the engine uses, grouped by analyzer.
///
/// Defaults reproduce the built-in thresholds exactly. Deserializing a partial
/// document fills the missing sections and fields from those defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub correlation: CorrelationConfig,
    pub temporal: TemporalConfig,
    pub deficiency: DeficiencyConfig,
    pub insights: InsightConfig,
}

impl AnalysisConfig {
    /// Rejects thresholds no analyzer can work with.
    ///
    /// Counts must be at least 1, ratios must lie in `[0.0, 1.0]`, and every
    /// deficiency rule needs finite positive `below` and `target` values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("correlation.min_occurrences", self.correlation.min_occurrences),
            (
                "correlation.symptom_trigger_min_occurrences",
                self.correlation.symptom_trigger_min_occurrences,
            ),
            ("temporal.min_samples", self.temporal.min_samples),
            ("temporal.top_n", self.temporal.top_n),
            ("deficiency.window_entries", self.deficiency.window_entries),
            ("insights.min_meal_logs", self.insights.min_meal_logs),
        ];
        if let Some((field, _)) = counts.into_iter().find(|(_, count)| *count == 0) {
            return Err(ConfigError::ZeroCount { field });
        }

        let ratios = [
            ("correlation.negative_ratio", self.correlation.negative_ratio),
            ("correlation.positive_ratio", self.correlation.positive_ratio),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioOutOfRange { field, value });
            }
        }

        for rule in &self.deficiency.rules {
            for value in [rule.below, rule.target] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::NonPositiveTarget {
                        nutrient: rule.nutrient,
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(AnalysisConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_counts_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.temporal.min_samples = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCount {
                field: "temporal.min_samples"
            })
        );

        let mut config = AnalysisConfig::default();
        config.insights.min_meal_logs = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCount {
                field: "insights.min_meal_logs"
            })
        );
    }

    #[test]
    fn ratios_outside_unit_interval_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.correlation.positive_ratio = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange {
                field: "correlation.positive_ratio",
                value: 1.5
            })
        );

        let mut config = AnalysisConfig::default();
        config.correlation.negative_ratio = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange {
                field: "correlation.negative_ratio",
                ..
            })
        ));
    }

    #[test]
    fn ratio_bounds_are_inclusive() {
        let mut config = AnalysisConfig::default();
        config.correlation.negative_ratio = 0.0;
        config.correlation.positive_ratio = 1.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn non_positive_rule_values_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.deficiency.rules[1].target = -5.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveTarget {
                nutrient: Nutrient::Calories,
                value: -5.0
            })
        );
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ConfigError::ZeroCount {
            field: "temporal.top_n",
        };
        assert_eq!(err.to_string(), "temporal.top_n must be at least 1");

        let err = ConfigError::NonPositiveTarget {
            nutrient: Nutrient::Protein,
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "protein rule thresholds must be positive, got 0"
        );
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"temporal": {"top_n": 5}}"#).unwrap();
        assert_eq!(config.temporal.top_n, 5);
        assert_eq!(config.temporal.min_samples, 2);
        assert_eq!(config.correlation, CorrelationConfig::default());
        assert_eq!(config.deficiency.window_entries, 7);
        assert_eq!(config.insights.min_meal_logs, 5);
    }
}
