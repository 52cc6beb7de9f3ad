//! Sensitivity command: trigger foods, safe foods and symptom links.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::Result;
use gf_core::{
    CorrelationConfig, SensitivityReport, Snapshot, SymptomCorrelation, SymptomType,
    sensitivity_report, symptom_correlations,
};
use gf_db::Database;
use serde::Serialize;

use super::util::percent;

/// Computed sensitivity data.
#[derive(Debug, Serialize)]
pub struct SensitivityData {
    #[serde(flatten)]
    pub report: SensitivityReport,
    pub symptoms: BTreeMap<SymptomType, Vec<SymptomCorrelation>>,
}

pub fn generate_sensitivity_data(
    snapshot: &Snapshot,
    config: &CorrelationConfig,
) -> SensitivityData {
    SensitivityData {
        report: sensitivity_report(&snapshot.meals, config),
        symptoms: symptom_correlations(&snapshot.symptoms, &snapshot.meals),
    }
}

/// Formats the human-readable sensitivity report.
pub fn format_sensitivity(data: &SensitivityData, config: &CorrelationConfig) -> String {
    let mut output = String::new();

    writeln!(output, "TRIGGER FOODS").unwrap();
    if data.report.triggers.is_empty() {
        writeln!(output, "  None yet.").unwrap();
    }
    for food in &data.report.triggers {
        writeln!(
            output,
            "  {}: negative after {} of {} meals ({})",
            food.food_name,
            food.negative_count,
            food.occurrences,
            percent(food.negative_ratio)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SAFE FOODS").unwrap();
    if data.report.safe.is_empty() {
        writeln!(output, "  None yet.").unwrap();
    }
    for food in &data.report.safe {
        writeln!(
            output,
            "  {}: positive after {} of {} meals ({})",
            food.food_name,
            food.positive_count,
            food.occurrences,
            percent(food.positive_ratio)
        )
        .unwrap();
    }

    if data.report.triggers.is_empty() && data.report.safe.is_empty() {
        writeln!(
            output,
            "\nHint: Foods need {}+ meals with moods before they are classified.",
            config.min_occurrences
        )
        .unwrap();
    }

    if !data.symptoms.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "SYMPTOM LINKS").unwrap();
        for (symptom_type, foods) in &data.symptoms {
            writeln!(output, "  {}", symptom_type.display_name()).unwrap();
            for food in foods {
                writeln!(
                    output,
                    "    {}: {}x, intensity {:.1}, ~{:.1} h after eating",
                    food.food_name, food.occurrences, food.avg_intensity, food.avg_delay_hours
                )
                .unwrap();
            }
        }
    }

    output
}

/// Formats sensitivity data as JSON.
pub fn format_sensitivity_json(data: &SensitivityData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the sensitivity command.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    db: &Database,
    config: &CorrelationConfig,
    json: bool,
) -> Result<()> {
    let snapshot = Snapshot::capture(db)?;
    let data = generate_sensitivity_data(&snapshot, config);

    if json {
        writeln!(writer, "{}", format_sensitivity_json(&data)?)?;
    } else {
        write!(writer, "{}", format_sensitivity(&data, config))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Duration, Utc};
    use gf_core::{MealId, MealLog, MoodLabel, SymptomId, SymptomLog};
    use insta::assert_snapshot;

    fn meals(food: &str, moods: &[MoodLabel]) -> Vec<MealLog> {
        let start: DateTime<Utc> = "2026-03-02T08:00:00Z".parse().unwrap();
        moods
            .iter()
            .zip(0_i64..)
            .map(|(mood, idx)| {
                MealLog::new(
                    MealId::new(format!("{food}-{idx}")).unwrap(),
                    start + Duration::hours(idx),
                    food,
                    500,
                )
                .with_mood(*mood)
            })
            .collect()
    }

    fn symptom(id: &str, meal_id: &str, intensity: u8, hours: f64) -> SymptomLog {
        SymptomLog {
            id: SymptomId::new(id).unwrap(),
            timestamp: "2026-03-02T14:00:00Z".parse().unwrap(),
            symptom_type: SymptomType::Bloating,
            intensity,
            hours_after_meal: hours,
            linked_meal_id: Some(MealId::new(meal_id).unwrap()),
        }
    }

    fn sample_snapshot() -> Snapshot {
        use MoodLabel::{Bad, FeelOk, Good, VeryBad};
        let mut all = meals("Milk Shake", &[Bad, Bad, Bad, Good, VeryBad]);
        all.extend(meals("Oats", &[Good, Good, FeelOk, Good]));
        Snapshot {
            meals: all,
            symptoms: vec![
                symptom("s1", "Milk Shake-0", 3, 1.0),
                symptom("s2", "Milk Shake-1", 4, 2.0),
                symptom("s3", "gone", 5, 1.0),
            ],
        }
    }

    #[test]
    fn test_sensitivity_empty() {
        let config = CorrelationConfig::default();
        let data = generate_sensitivity_data(&Snapshot::default(), &config);
        assert_snapshot!(format_sensitivity(&data, &config), @r"
        TRIGGER FOODS
          None yet.

        SAFE FOODS
          None yet.

        Hint: Foods need 3+ meals with moods before they are classified.
        ");
    }

    #[test]
    fn test_sensitivity_report() {
        let config = CorrelationConfig::default();
        let data = generate_sensitivity_data(&sample_snapshot(), &config);
        assert_snapshot!(format_sensitivity(&data, &config), @r"
        TRIGGER FOODS
          Milk Shake: negative after 4 of 5 meals (80%)

        SAFE FOODS
          Oats: positive after 4 of 4 meals (100%)

        SYMPTOM LINKS
          Bloating
            Milk Shake: 2x, intensity 3.5, ~1.5 h after eating
        ");
    }

    #[test]
    fn test_sensitivity_json_output() {
        let config = CorrelationConfig::default();
        let mut snapshot = sample_snapshot();
        snapshot.meals.retain(|meal| meal.food_name == "Oats");
        let data = generate_sensitivity_data(&snapshot, &config);
        assert_snapshot!(format_sensitivity_json(&data).unwrap(), @r#"
        {
          "triggers": [],
          "safe": [
            {
              "food_name": "Oats",
              "occurrences": 4,
              "negative_count": 0,
              "positive_count": 4,
              "neutral_count": 0,
              "negative_ratio": 0.0,
              "positive_ratio": 1.0
            }
          ],
          "symptoms": {}
        }
        "#);
    }
}
