//! Insights command: what the user should know right now.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use gf_core::{AnalysisConfig, Insight, Snapshot, compose_insights};
use gf_db::Database;
use serde::Serialize;

/// Computed insights plus the data they were drawn from.
#[derive(Debug, Serialize)]
pub struct InsightsData {
    pub meal_count: usize,
    pub required_meals: usize,
    pub insights: Vec<Insight>,
}

pub fn generate_insights_data<Tz: TimeZone>(
    snapshot: &Snapshot,
    tz: &Tz,
    config: &AnalysisConfig,
) -> InsightsData {
    InsightsData {
        meal_count: snapshot.meals.len(),
        required_meals: config.insights.min_meal_logs,
        insights: compose_insights(&snapshot.meals, &snapshot.symptoms, tz, config),
    }
}

/// Formats the human-readable insight list.
pub fn format_insights(data: &InsightsData) -> String {
    let mut output = String::new();

    if data.meal_count < data.required_meals {
        writeln!(
            output,
            "Log at least {} meals to unlock insights ({} so far).",
            data.required_meals, data.meal_count
        )
        .unwrap();
        return output;
    }

    if data.insights.is_empty() {
        writeln!(output, "Nothing stands out yet. Keep logging meals and moods.").unwrap();
        return output;
    }

    writeln!(output, "INSIGHTS").unwrap();
    for (i, insight) in data.insights.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        writeln!(output, "  [{}] {}", insight.kind, insight.title).unwrap();
        writeln!(output, "    {}", insight.message).unwrap();
    }

    output
}

/// Formats insights as JSON.
pub fn format_insights_json(data: &InsightsData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the insights command in the local time zone.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    db: &Database,
    config: &AnalysisConfig,
    json: bool,
) -> Result<()> {
    let snapshot = Snapshot::capture(db)?;
    let data = generate_insights_data(&snapshot, &Local, config);

    if json {
        writeln!(writer, "{}", format_insights_json(&data)?)?;
    } else {
        write!(writer, "{}", format_insights(&data))?;
    }
    Ok(())
}
