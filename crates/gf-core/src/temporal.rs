//! Day-of-week and hour-of-day mood patterns.
//!
//! Meals are bucketed by the local weekday or hour they were eaten at. Only
//! meals with a recorded mood take part, since an unlabeled meal says nothing
//! about how the day went.

use chrono::{Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};

use crate::log::MealLog;
use crate::mood::MoodBucket;
use crate::stats::ratio;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Qualification and truncation for pattern rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Minimum labeled meals before a weekday or hour is ranked. Default: 2.
    pub min_samples: usize,
    /// Maximum entries returned. Default: 2.
    pub top_n: usize,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            min_samples: 2,
            top_n: 2,
        }
    }
}

/// Mood outcome counts for one weekday or hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalBucket<K> {
    pub key: K,
    pub total: usize,
    pub negative_count: usize,
    pub positive_count: usize,
}

impl<K> TemporalBucket<K> {
    const fn empty(key: K) -> Self {
        Self {
            key,
            total: 0,
            negative_count: 0,
            positive_count: 0,
        }
    }

    fn record(&mut self, bucket: MoodBucket) {
        self.total += 1;
        match bucket {
            MoodBucket::Negative => self.negative_count += 1,
            MoodBucket::Positive => self.positive_count += 1,
            MoodBucket::Neutral => {}
        }
    }

    pub fn negative_ratio(&self) -> f64 {
        ratio(self.negative_count, self.total)
    }
}

/// A ranked weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPattern {
    #[serde(serialize_with = "serialize_weekday")]
    pub day: Weekday,
    pub negative_ratio: f64,
    pub total: usize,
}

/// A ranked hour of the day (0-23).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPattern {
    pub hour: u32,
    pub negative_ratio: f64,
    pub total: usize,
}

/// Full English name of a weekday.
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

/// Buckets labeled meals by local weekday, Monday first. Empty days are omitted.
pub fn weekday_buckets<Tz: TimeZone>(logs: &[MealLog], tz: &Tz) -> Vec<TemporalBucket<Weekday>> {
    let mut buckets = WEEKDAYS.map(TemporalBucket::empty);
    for log in logs.iter().filter(|log| log.is_well_formed()) {
        let Some(mood) = log.mood else { continue };
        let day = log.timestamp.with_timezone(tz).weekday();
        buckets[day.num_days_from_monday() as usize].record(mood.bucket());
    }
    buckets.into_iter().filter(|b| b.total > 0).collect()
}

/// Buckets labeled meals by local hour, midnight first. Empty hours are omitted.
pub fn hour_buckets<Tz: TimeZone>(logs: &[MealLog], tz: &Tz) -> Vec<TemporalBucket<u32>> {
    let mut buckets: Vec<TemporalBucket<u32>> = (0..24).map(TemporalBucket::empty).collect();
    for log in logs.iter().filter(|log| log.is_well_formed()) {
        let Some(mood) = log.mood else { continue };
        let hour = log.timestamp.with_timezone(tz).hour();
        buckets[hour as usize].record(mood.bucket());
    }
    buckets.into_iter().filter(|b| b.total > 0).collect()
}

/// Keeps buckets with enough samples, sorted by negative ratio descending
/// (ties keep calendar order), truncated to `top_n`.
fn rank<K>(buckets: Vec<TemporalBucket<K>>, config: &TemporalConfig) -> Vec<TemporalBucket<K>> {
    let mut qualified: Vec<TemporalBucket<K>> = buckets
        .into_iter()
        .filter(|bucket| bucket.total >= config.min_samples)
        .collect();
    qualified.sort_by(|a, b| b.negative_ratio().total_cmp(&a.negative_ratio()));
    qualified.truncate(config.top_n);
    qualified
}

/// Weekdays with the highest share of negative moods.
pub fn worst_days<Tz: TimeZone>(
    logs: &[MealLog],
    tz: &Tz,
    config: &TemporalConfig,
) -> Vec<DayPattern> {
    rank(weekday_buckets(logs, tz), config)
        .into_iter()
        .map(|bucket| DayPattern {
            day: bucket.key,
            negative_ratio: bucket.negative_ratio(),
            total: bucket.total,
        })
        .collect()
}

/// Hours of the day with the highest share of negative moods.
pub fn hourly_pattern<Tz: TimeZone>(
    logs: &[MealLog],
    tz: &Tz,
    config: &TemporalConfig,
) -> Vec<HourPattern> {
    rank(hour_buckets(logs, tz), config)
        .into_iter()
        .map(|bucket| HourPattern {
            hour: bucket.key,
            negative_ratio: bucket.negative_ratio(),
            total: bucket.total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{FixedOffset, Utc};

    use crate::fixtures::meal;
    use crate::mood::MoodLabel::{Bad, Good, Neutral, VeryBad};

    // 2026-03-02 is a Monday.

    #[test]
    fn worst_days_ranks_by_negative_ratio() {
        let logs = vec![
            meal("a", "2026-03-02T08:00:00Z", "Eggs", Some(Bad)),
            meal("b", "2026-03-02T12:00:00Z", "Pasta", Some(VeryBad)),
            meal("c", "2026-03-03T08:00:00Z", "Eggs", Some(Bad)),
            meal("d", "2026-03-03T12:00:00Z", "Salad", Some(Good)),
            meal("e", "2026-03-04T08:00:00Z", "Eggs", Some(Good)),
            meal("f", "2026-03-04T12:00:00Z", "Salad", Some(Good)),
        ];

        let days = worst_days(&logs, &Utc, &TemporalConfig::default());

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, Weekday::Mon);
        assert!((days[0].negative_ratio - 1.0).abs() < 1e-9);
        assert_eq!(days[1].day, Weekday::Tue);
        assert!((days[1].negative_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn days_below_min_samples_do_not_qualify() {
        let logs = vec![
            meal("a", "2026-03-06T08:00:00Z", "Tacos", Some(VeryBad)),
            meal("b", "2026-03-02T08:00:00Z", "Eggs", Some(Good)),
            meal("c", "2026-03-02T12:00:00Z", "Eggs", Some(Bad)),
        ];
        let days = worst_days(&logs, &Utc, &TemporalConfig::default());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, Weekday::Mon);
    }

    #[test]
    fn ties_keep_calendar_order() {
        let logs = vec![
            meal("a", "2026-03-05T08:00:00Z", "Eggs", Some(Bad)),
            meal("b", "2026-03-05T12:00:00Z", "Eggs", Some(Good)),
            meal("c", "2026-03-03T08:00:00Z", "Eggs", Some(Bad)),
            meal("d", "2026-03-03T12:00:00Z", "Eggs", Some(Good)),
        ];
        let config = TemporalConfig {
            min_samples: 2,
            top_n: 1,
        };
        let days = worst_days(&logs, &Utc, &config);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, Weekday::Tue);
    }

    #[test]
    fn unlabeled_meals_are_ignored_and_neutral_counts_in_total() {
        let logs = vec![
            meal("a", "2026-03-02T08:00:00Z", "Eggs", None),
            meal("b", "2026-03-02T12:00:00Z", "Eggs", Some(Neutral)),
            meal("c", "2026-03-02T18:00:00Z", "Eggs", Some(Bad)),
        ];
        let buckets = weekday_buckets(&logs, &Utc);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 2);
        assert_eq!(buckets[0].negative_count, 1);
        assert_eq!(buckets[0].positive_count, 0);
    }

    #[test]
    fn weekday_uses_local_time() {
        // Monday 01:00 UTC is still Sunday at UTC-3
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let logs = vec![meal("a", "2026-03-02T01:00:00Z", "Ramen", Some(Bad))];
        assert_eq!(weekday_buckets(&logs, &tz)[0].key, Weekday::Sun);
        assert_eq!(weekday_buckets(&logs, &Utc)[0].key, Weekday::Mon);
    }

    #[test]
    fn hourly_pattern_has_same_shape() {
        let logs = vec![
            meal("a", "2026-03-02T22:10:00Z", "Chips", Some(Bad)),
            meal("b", "2026-03-03T22:40:00Z", "Chips", Some(VeryBad)),
            meal("c", "2026-03-02T08:00:00Z", "Oats", Some(Good)),
            meal("d", "2026-03-03T08:30:00Z", "Oats", Some(Bad)),
            meal("e", "2026-03-04T13:00:00Z", "Soup", Some(Bad)),
        ];

        let hours = hourly_pattern(&logs, &Utc, &TemporalConfig::default());

        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].hour, 22);
        assert!((hours[0].negative_ratio - 1.0).abs() < 1e-9);
        assert_eq!(hours[1].hour, 8);
        assert_eq!(hours[1].total, 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(worst_days(&[], &Utc, &TemporalConfig::default()).is_empty());
        assert!(hourly_pattern(&[], &Utc, &TemporalConfig::default()).is_empty());
    }

    #[test]
    fn day_pattern_serializes_full_weekday_name() {
        let pattern = DayPattern {
            day: Weekday::Wed,
            negative_ratio: 0.5,
            total: 4,
        };
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, r#"{"day":"Wednesday","negative_ratio":0.5,"total":4}"#);
    }
}
