//! Shared builders for unit tests.

use chrono::{DateTime, Duration, Utc};

use crate::log::{MealLog, SymptomLog, SymptomType};
use crate::mood::MoodLabel;
use crate::types::{MealId, SymptomId};

pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

pub fn meal(id: &str, timestamp: &str, food: &str, mood: Option<MoodLabel>) -> MealLog {
    let mut log = MealLog::new(MealId::new(id).unwrap(), at(timestamp), food, 500);
    log.mood = mood;
    log
}

/// One meal of `food` per mood, an hour apart starting Monday 2026-03-02 08:00 UTC.
pub fn meals_of(food: &str, moods: &[MoodLabel]) -> Vec<MealLog> {
    let start = at("2026-03-02T08:00:00Z");
    moods
        .iter()
        .enumerate()
        .map(|(idx, mood)| {
            let offset = i64::try_from(idx).unwrap();
            MealLog::new(
                MealId::new(format!("{food}-{idx}")).unwrap(),
                start + Duration::hours(offset),
                food,
                500,
            )
            .with_mood(*mood)
        })
        .collect()
}

pub fn symptom(
    id: &str,
    symptom_type: SymptomType,
    intensity: u8,
    hours_after_meal: f64,
    meal_id: Option<&str>,
) -> SymptomLog {
    SymptomLog {
        id: SymptomId::new(id).unwrap(),
        timestamp: at("2026-03-02T14:00:00Z"),
        symptom_type,
        intensity,
        hours_after_meal,
        linked_meal_id: meal_id.map(|id| MealId::new(id).unwrap()),
    }
}
