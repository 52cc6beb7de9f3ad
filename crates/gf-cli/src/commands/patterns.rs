//! Patterns command: the weekdays and hours most often followed by a bad mood.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use gf_core::temporal::weekday_name;
use gf_core::{
    DayPattern, HourPattern, MealLog, Snapshot, TemporalConfig, hourly_pattern, worst_days,
};
use gf_db::Database;
use serde::Serialize;

use super::util::{local_timezone_name, percent};

/// Computed pattern data.
#[derive(Debug, Serialize)]
pub struct PatternsData {
    pub timezone: String,
    pub worst_days: Vec<DayPattern>,
    pub worst_hours: Vec<HourPattern>,
}

pub fn generate_patterns_data<Tz: TimeZone>(
    meals: &[MealLog],
    tz: &Tz,
    timezone: String,
    config: &TemporalConfig,
) -> PatternsData {
    PatternsData {
        timezone,
        worst_days: worst_days(meals, tz, config),
        worst_hours: hourly_pattern(meals, tz, config),
    }
}

/// Formats the human-readable pattern report.
pub fn format_patterns(data: &PatternsData, config: &TemporalConfig) -> String {
    let mut output = String::new();

    if data.worst_days.is_empty() && data.worst_hours.is_empty() {
        writeln!(output, "No patterns yet.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: A weekday or hour needs {}+ meals with moods to be ranked.",
            config.min_samples
        )
        .unwrap();
        return output;
    }

    writeln!(output, "HARDEST DAYS ({})", data.timezone).unwrap();
    for day in &data.worst_days {
        writeln!(
            output,
            "  {:<10} {:>4} negative ({} meals)",
            weekday_name(day.day),
            percent(day.negative_ratio),
            day.total
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "HARDEST HOURS ({})", data.timezone).unwrap();
    for hour in &data.worst_hours {
        writeln!(
            output,
            "  {:02}:00-{:02}:59 {:>4} negative ({} meals)",
            hour.hour,
            hour.hour,
            percent(hour.negative_ratio),
            hour.total
        )
        .unwrap();
    }

    output
}

/// Formats pattern data as JSON.
pub fn format_patterns_json(data: &PatternsData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the patterns command in the local time zone.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    db: &Database,
    config: &TemporalConfig,
    json: bool,
) -> Result<()> {
    let snapshot = Snapshot::capture(db)?;
    let data = generate_patterns_data(&snapshot.meals, &Local, local_timezone_name(), config);

    if json {
        writeln!(writer, "{}", format_patterns_json(&data)?)?;
    } else {
        write!(writer, "{}", format_patterns(&data, config))?;
    }
    Ok(())
}
