//! Summary command: weekly totals, streak and nutrient averages.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use gf_core::{
    MealLog, MoodLabel, NutrientAverages, Snapshot, WeeklySummary, current_streak,
    nutrient_averages, nutrient_trends_by_mood, weekly_summary,
};
use gf_db::Database;
use serde::Serialize;

use super::util::local_timezone_name;

/// Computed summary data.
#[derive(Debug, Serialize)]
pub struct SummaryData {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub weekly: WeeklySummary,
    pub streak_days: u32,
    pub averages: Option<NutrientAverages>,
    pub by_mood: BTreeMap<MoodLabel, NutrientAverages>,
}

/// Builds the summary for `meals` as of `now`, using `tz` for calendar days.
pub fn generate_summary_data<Tz: TimeZone>(
    meals: &[MealLog],
    now: DateTime<Utc>,
    tz: &Tz,
    timezone: String,
) -> SummaryData {
    let today = now.with_timezone(tz).date_naive();
    SummaryData {
        generated_at: now,
        timezone,
        weekly: weekly_summary(meals, now),
        streak_days: current_streak(meals, today, tz),
        averages: nutrient_averages(meals),
        by_mood: nutrient_trends_by_mood(meals),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Formats the human-readable summary.
pub fn format_summary(data: &SummaryData) -> String {
    let mut output = String::new();
    let weekly = &data.weekly;

    writeln!(output, "LAST 7 DAYS").unwrap();
    writeln!(output, "  Meals logged:   {}", weekly.total_entries).unwrap();
    writeln!(output, "  Total calories: {} kcal", weekly.total_calories).unwrap();
    writeln!(output, "  Daily average:  {} kcal", weekly.avg_daily_calories).unwrap();
    if !weekly.mood_counts.is_empty() {
        let moods: Vec<String> = weekly
            .mood_counts
            .iter()
            .rev()
            .map(|(mood, count)| format!("{mood} {count}"))
            .collect();
        writeln!(output, "  Moods:          {}", moods.join(", ")).unwrap();
    }

    let streak = if data.streak_days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", data.streak_days)
    };
    writeln!(output, "  Streak:         {streak}").unwrap();

    let Some(averages) = &data.averages else {
        writeln!(output).unwrap();
        writeln!(output, "No meals logged yet.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'gf log meal --food ... --calories ...' to start.").unwrap();
        return output;
    };

    writeln!(output).unwrap();
    writeln!(output, "AVERAGE PER MEAL ({})", plural(averages.count, "meal")).unwrap();
    writeln!(output, "  {}", format_averages(averages)).unwrap();

    if !data.by_mood.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "BY MOOD").unwrap();
        for (mood, averages) in data.by_mood.iter().rev() {
            writeln!(
                output,
                "  {:<9} {:>10}  {}",
                mood.as_str(),
                plural(averages.count, "meal"),
                format_averages(averages)
            )
            .unwrap();
        }
    }

    output
}

fn format_averages(averages: &NutrientAverages) -> String {
    format!(
        "{:.0} kcal, {:.1} g protein, {:.1} g carbs, {:.1} g fats",
        averages.avg_calories, averages.avg_protein, averages.avg_carbs, averages.avg_fats
    )
}

/// Formats summary data as JSON.
pub fn format_summary_json(data: &SummaryData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the summary command.
pub fn run<W: std::io::Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let snapshot = Snapshot::capture(db)?;
    let data = generate_summary_data(&snapshot.meals, Utc::now(), &Local, local_timezone_name());

    if json {
        writeln!(writer, "{}", format_summary_json(&data)?)?;
    } else {
        write!(writer, "{}", format_summary(&data))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use gf_core::MealId;
    use insta::assert_snapshot;

    fn now() -> DateTime<Utc> {
        "2026-03-04T20:00:00Z".parse().unwrap()
    }

    fn meal(id: &str, timestamp: &str, calories: u32, protein: f64, mood: Option<MoodLabel>) -> MealLog {
        let mut log = MealLog::new(
            MealId::new(id).unwrap(),
            timestamp.parse().unwrap(),
            "Meal",
            calories,
        )
        .with_macros(protein, 50.0, 10.0);
        log.mood = mood;
        log
    }

    fn sample_meals() -> Vec<MealLog> {
        vec![
            meal("a", "2026-03-02T08:00:00Z", 400, 20.0, Some(MoodLabel::Good)),
            meal("b", "2026-03-03T12:00:00Z", 800, 30.0, Some(MoodLabel::Bad)),
            meal("c", "2026-03-04T12:00:00Z", 600, 25.0, Some(MoodLabel::Good)),
            meal("d", "2026-03-04T18:00:00Z", 300, 5.0, None),
        ]
    }

    #[test]
    fn test_summary_empty() {
        let data = generate_summary_data(&[], now(), &Utc, "UTC".to_string());
        assert_snapshot!(format_summary(&data), @r"
        LAST 7 DAYS
          Meals logged:   0
          Total calories: 0 kcal
          Daily average:  0 kcal
          Streak:         0 days

        No meals logged yet.

        Hint: Run 'gf log meal --food ... --calories ...' to start.
        ");
    }

    #[test]
    fn test_summary_with_meals() {
        let data = generate_summary_data(&sample_meals(), now(), &Utc, "UTC".to_string());
        assert_snapshot!(format_summary(&data), @r"
        LAST 7 DAYS
          Meals logged:   4
          Total calories: 2100 kcal
          Daily average:  300 kcal
          Moods:          good 2, bad 1
          Streak:         3 days

        AVERAGE PER MEAL (4 meals)
          525 kcal, 20.0 g protein, 50.0 g carbs, 10.0 g fats

        BY MOOD
          good         2 meals  500 kcal, 22.5 g protein, 50.0 g carbs, 10.0 g fats
          bad           1 meal  800 kcal, 30.0 g protein, 50.0 g carbs, 10.0 g fats
        ");
    }

    #[test]
    fn test_summary_json_output() {
        let meals = sample_meals();
        let data = generate_summary_data(&meals[..1], now(), &Utc, "UTC".to_string());
        assert_snapshot!(format_summary_json(&data).unwrap(), @r#"
        {
          "generated_at": "2026-03-04T20:00:00Z",
          "timezone": "UTC",
          "weekly": {
            "total_calories": 400,
            "avg_daily_calories": 57,
            "mood_counts": {
              "good": 1
            },
            "total_entries": 1
          },
          "streak_days": 0,
          "averages": {
            "avg_calories": 400.0,
            "avg_protein": 20.0,
            "avg_carbs": 50.0,
            "avg_fats": 10.0,
            "count": 1
          },
          "by_mood": {
            "good": {
              "avg_calories": 400.0,
              "avg_protein": 20.0,
              "avg_carbs": 50.0,
              "avg_fats": 10.0,
              "count": 1
            }
          }
        }
        "#);
    }
}
