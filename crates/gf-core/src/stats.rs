//! Windowed aggregates over meal logs.
//!
//! Weekly totals, per-mood nutrient averages and logging streaks. These are the
//! raw numbers the goal/achievement layer and the other analyzers build on.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::log::MealLog;
use crate::mood::MoodLabel;

/// Length of the weekly summary window. Averages divide by this, not by the
/// number of days that actually have logs.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Upper bound on how far back a streak walk goes.
pub const STREAK_HORIZON_DAYS: u32 = 365;

/// Totals over the trailing seven days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklySummary {
    pub total_calories: u64,
    pub avg_daily_calories: u64,
    pub mood_counts: BTreeMap<MoodLabel, usize>,
    pub total_entries: usize,
}

/// Mean nutrient intake per meal for some group of meals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientAverages {
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fats: f64,
    pub count: usize,
}

#[derive(Debug, Default)]
struct NutrientTotals {
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    count: usize,
}

impl NutrientTotals {
    fn add(&mut self, log: &MealLog) {
        self.calories += f64::from(log.calories);
        self.protein += log.protein_grams;
        self.carbs += log.carbs_grams;
        self.fats += log.fats_grams;
        self.count += 1;
    }

    fn averages(&self) -> Option<NutrientAverages> {
        if self.count == 0 {
            return None;
        }
        Some(NutrientAverages {
            avg_calories: mean(self.calories, self.count),
            avg_protein: mean(self.protein, self.count),
            avg_carbs: mean(self.carbs, self.count),
            avg_fats: mean(self.fats, self.count),
            count: self.count,
        })
    }
}

/// `part / whole`, or 0 for an empty group.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `sum / count`, or 0 for an empty group.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Summarizes meals logged at or after `now - 7 days`.
///
/// `avg_daily_calories` is the total divided by 7 and rounded, even when only
/// a few of those days have entries.
pub fn weekly_summary(logs: &[MealLog], now: DateTime<Utc>) -> WeeklySummary {
    let window_start = now - Duration::days(WEEKLY_WINDOW_DAYS);
    let mut summary = WeeklySummary::default();

    for log in logs
        .iter()
        .filter(|log| log.is_well_formed() && log.timestamp >= window_start)
    {
        summary.total_calories += u64::from(log.calories);
        summary.total_entries += 1;
        if let Some(mood) = log.mood {
            *summary.mood_counts.entry(mood).or_insert(0) += 1;
        }
    }

    // Integer round-half-up of total / 7
    let days = WEEKLY_WINDOW_DAYS.unsigned_abs();
    summary.avg_daily_calories = (summary.total_calories + days / 2) / days;
    summary
}

/// Averages nutrients per mood label. Moods with no meals are omitted and
/// unlabeled meals are ignored.
pub fn nutrient_trends_by_mood(logs: &[MealLog]) -> BTreeMap<MoodLabel, NutrientAverages> {
    let mut totals: BTreeMap<MoodLabel, NutrientTotals> = BTreeMap::new();
    for log in logs.iter().filter(|log| log.is_well_formed()) {
        if let Some(mood) = log.mood {
            totals.entry(mood).or_default().add(log);
        }
    }
    totals
        .into_iter()
        .filter_map(|(mood, totals)| totals.averages().map(|avg| (mood, avg)))
        .collect()
}

/// Averages nutrients across every well-formed meal. `None` when there are none.
pub fn nutrient_averages(logs: &[MealLog]) -> Option<NutrientAverages> {
    let mut totals = NutrientTotals::default();
    for log in logs.iter().filter(|log| log.is_well_formed()) {
        totals.add(log);
    }
    totals.averages()
}

/// Counts consecutive calendar days with at least one meal, ending today or
/// yesterday.
///
/// Malformed meals are skipped. Dates are taken in `tz`, so a meal at 23:30 local time counts for that
/// local day regardless of its UTC date. Returns 0 when neither today nor
/// yesterday has a log. The walk stops after [`STREAK_HORIZON_DAYS`].
pub fn current_streak<Tz: TimeZone>(logs: &[MealLog], today: NaiveDate, tz: &Tz) -> u32 {
    let logged_days: HashSet<NaiveDate> = logs
        .iter()
        .filter(|log| log.is_well_formed())
        .map(|log| log.timestamp.with_timezone(tz).date_naive())
        .collect();

    let mut day = if logged_days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if logged_days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while streak < STREAK_HORIZON_DAYS && logged_days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    tracing::debug!(streak, %today, "computed logging streak");
    streak
}
