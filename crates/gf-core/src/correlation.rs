//! Food sensitivity analysis.
//!
//! Classifies foods as triggers or safe foods from the moods recorded after
//! eating them, and links symptoms back to the meals they followed.
//!
//! # Thresholds
//!
//! A food is a trigger when it was eaten at least `min_occurrences` times and
//! more than `negative_ratio` of those meals were followed by a negative mood.
//! Safe foods use `positive_ratio` the same way. Neutral and unlabeled meals
//! count towards occurrences but towards neither ratio.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::log::{MealLog, SymptomLog, SymptomType};
use crate::mood::{MoodBucket, bucket_of};
use crate::stats::ratio;
use crate::types::MealId;

/// Thresholds for trigger and safe food classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Minimum meals of a food before it can be classified. Default: 3.
    pub min_occurrences: usize,
    /// A trigger's negative ratio must exceed this. Default: 0.6.
    pub negative_ratio: f64,
    /// A safe food's positive ratio must exceed this. Default: 0.7.
    pub positive_ratio: f64,
    /// Minimum symptom links for a food to enter the menu-check trigger set.
    /// Default: 2.
    pub symptom_trigger_min_occurrences: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 3,
            negative_ratio: 0.6,
            positive_ratio: 0.7,
            symptom_trigger_min_occurrences: 2,
        }
    }
}

/// Mood outcome counts for one food.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodCorrelation {
    /// First spelling seen for this food.
    pub food_name: String,
    pub occurrences: usize,
    pub negative_count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_ratio: f64,
    pub positive_ratio: f64,
}

impl FoodCorrelation {
    fn new(food_name: &str) -> Self {
        Self {
            food_name: food_name.trim().to_string(),
            occurrences: 0,
            negative_count: 0,
            positive_count: 0,
            neutral_count: 0,
            negative_ratio: 0.0,
            positive_ratio: 0.0,
        }
    }

    fn record(&mut self, bucket: MoodBucket) {
        self.occurrences += 1;
        match bucket {
            MoodBucket::Negative => self.negative_count += 1,
            MoodBucket::Positive => self.positive_count += 1,
            MoodBucket::Neutral => self.neutral_count += 1,
        }
        self.negative_ratio = ratio(self.negative_count, self.occurrences);
        self.positive_ratio = ratio(self.positive_count, self.occurrences);
    }

    fn is_trigger(&self, config: &CorrelationConfig) -> bool {
        self.occurrences >= config.min_occurrences && self.negative_ratio > config.negative_ratio
    }

    fn is_safe(&self, config: &CorrelationConfig) -> bool {
        self.occurrences >= config.min_occurrences && self.positive_ratio > config.positive_ratio
    }
}

/// Foods that stand out in either direction, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub triggers: Vec<FoodCorrelation>,
    pub safe: Vec<FoodCorrelation>,
}

/// How one food relates to one symptom type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomCorrelation {
    pub food_name: String,
    pub occurrences: usize,
    pub avg_intensity: f64,
    pub avg_delay_hours: f64,
}

impl SymptomCorrelation {
    /// Folds one observation into the running means.
    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self, intensity: u8, delay_hours: f64) {
        self.occurrences += 1;
        let n = self.occurrences as f64;
        self.avg_intensity = self.avg_intensity.mul_add(n - 1.0, f64::from(intensity)) / n;
        self.avg_delay_hours = self.avg_delay_hours.mul_add(n - 1.0, delay_hours) / n;
    }
}

/// Tallies mood outcomes for every food, in first-seen order.
///
/// Malformed meals are skipped.
pub fn food_correlations(meal_logs: &[MealLog]) -> Vec<FoodCorrelation> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<FoodCorrelation> = Vec::new();

    for log in meal_logs.iter().filter(|log| log.is_well_formed()) {
        let slot = *index.entry(log.food_key()).or_insert_with(|| {
            tallies.push(FoodCorrelation::new(&log.food_name));
            tallies.len() - 1
        });
        tallies[slot].record(bucket_of(log.mood));
    }

    tallies
}

/// Splits foods into triggers and safe foods.
///
/// Both lists are sorted by occurrences descending; ties keep first-seen order.
pub fn sensitivity_report(meal_logs: &[MealLog], config: &CorrelationConfig) -> SensitivityReport {
    let tallies = food_correlations(meal_logs);

    let mut triggers: Vec<FoodCorrelation> = tallies
        .iter()
        .filter(|food| food.is_trigger(config))
        .cloned()
        .collect();
    let mut safe: Vec<FoodCorrelation> = tallies
        .into_iter()
        .filter(|food| food.is_safe(config))
        .collect();

    triggers.sort_by_key(|food| Reverse(food.occurrences));
    safe.sort_by_key(|food| Reverse(food.occurrences));

    tracing::debug!(
        triggers = triggers.len(),
        safe = safe.len(),
        "computed sensitivity report"
    );
    SensitivityReport { triggers, safe }
}

/// Groups linked symptoms by type and the food of the meal they followed.
///
/// Symptoms without a linked meal, or whose meal no longer exists, are skipped.
/// Within each symptom type, foods are sorted by occurrences descending.
pub fn symptom_correlations(
    symptom_logs: &[SymptomLog],
    meal_logs: &[MealLog],
) -> BTreeMap<SymptomType, Vec<SymptomCorrelation>> {
    let meals: HashMap<&MealId, &MealLog> = meal_logs
        .iter()
        .filter(|log| log.is_well_formed())
        .map(|log| (&log.id, log))
        .collect();

    let mut groups: BTreeMap<SymptomType, (HashMap<String, usize>, Vec<SymptomCorrelation>)> =
        BTreeMap::new();

    for symptom in symptom_logs.iter().filter(|s| s.is_well_formed()) {
        let Some(meal_id) = symptom.linked_meal_id.as_ref() else {
            continue;
        };
        let Some(meal) = meals.get(meal_id) else {
            tracing::debug!(symptom_id = %symptom.id, %meal_id, "skipping dangling meal link");
            continue;
        };

        let (index, foods) = groups.entry(symptom.symptom_type).or_default();
        let slot = *index.entry(meal.food_key()).or_insert_with(|| {
            foods.push(SymptomCorrelation {
                food_name: meal.food_name.trim().to_string(),
                occurrences: 0,
                avg_intensity: 0.0,
                avg_delay_hours: 0.0,
            });
            foods.len() - 1
        });
        foods[slot].record(symptom.intensity, symptom.hours_after_meal);
    }

    groups
        .into_iter()
        .map(|(symptom_type, (_, mut foods))| {
            foods.sort_by_key(|food| Reverse(food.occurrences));
            (symptom_type, foods)
        })
        .collect()
}

/// Lowercased names of foods linked to any symptom at least
/// `symptom_trigger_min_occurrences` times.
///
/// Looser than the trigger threshold in [`sensitivity_report`]. Feeds menu
/// and meal checks.
pub fn trigger_foods(
    correlations: &BTreeMap<SymptomType, Vec<SymptomCorrelation>>,
    config: &CorrelationConfig,
) -> BTreeSet<String> {
    correlations
        .values()
        .flatten()
        .filter(|food| food.occurrences >= config.symptom_trigger_min_occurrences)
        .map(|food| food.food_name.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fixtures::{meal, meals_of, symptom};
    use crate::mood::MoodLabel::{Bad, FeelOk, Good, Neutral, VeryBad};

    fn report(logs: &[MealLog]) -> SensitivityReport {
        sensitivity_report(logs, &CorrelationConfig::default())
    }

    // ========== sensitivity_report ==========

    #[test]
    fn milk_shake_is_a_trigger() {
        let logs = meals_of("Milk Shake", &[Bad, Bad, Bad, Good, VeryBad]);
        let report = report(&logs);

        assert_eq!(report.triggers.len(), 1);
        let shake = &report.triggers[0];
        assert_eq!(shake.food_name, "Milk Shake");
        assert_eq!(shake.occurrences, 5);
        assert_eq!(shake.negative_count, 4);
        assert_eq!(shake.positive_count, 1);
        assert!((shake.negative_ratio - 0.8).abs() < 1e-9);
        assert!(report.safe.is_empty());
    }

    #[test]
    fn fewer_than_three_occurrences_never_classified() {
        let mut logs = meals_of("Chili", &[Bad, VeryBad]);
        logs.extend(meals_of("Oats", &[Good, FeelOk]));
        let report = report(&logs);
        assert!(report.triggers.is_empty());
        assert!(report.safe.is_empty());
    }

    #[test]
    fn ratio_must_strictly_exceed_threshold() {
        // 3 of 5 negative is exactly 0.6
        let logs = meals_of("Curry", &[Bad, Bad, Bad, Good, Good]);
        assert!(report(&logs).triggers.is_empty());

        // 7 of 10 positive is exactly 0.7
        let logs = meals_of(
            "Rice",
            &[Good, Good, Good, Good, Good, Good, Good, Bad, Bad, Bad],
        );
        assert!(report(&logs).safe.is_empty());
    }

    #[test]
    fn neutral_and_unlabeled_count_in_occurrences_only() {
        let mut logs = meals_of("Yogurt", &[Good, Good, Good, Neutral]);
        logs.push(meal("y-unlabeled", "2026-03-03T09:00:00Z", "yogurt", None));
        let tallies = food_correlations(&logs);

        assert_eq!(tallies.len(), 1);
        let yogurt = &tallies[0];
        assert_eq!(yogurt.occurrences, 5);
        assert_eq!(yogurt.positive_count, 3);
        assert_eq!(yogurt.neutral_count, 2);
        assert_eq!(
            yogurt.negative_count + yogurt.positive_count + yogurt.neutral_count,
            yogurt.occurrences
        );
        // 3 / 5 = 0.6 is not above 0.7
        assert!(report(&logs).safe.is_empty());
    }

    #[test]
    fn safe_foods_sorted_by_occurrence_with_stable_ties() {
        let mut logs = meals_of("Banana", &[Good, Good, Good]);
        logs.extend(meals_of("Oats", &[Good, FeelOk, Good, Good]));
        logs.extend(meals_of("Apple", &[Good, Good, Good]));
        let safe: Vec<String> = report(&logs)
            .safe
            .into_iter()
            .map(|food| food.food_name)
            .collect();
        assert_eq!(safe, vec!["Oats", "Banana", "Apple"]);
    }

    #[test]
    fn food_names_group_case_insensitively() {
        let logs = vec![
            meal("a", "2026-03-02T08:00:00Z", "Pizza", Some(Bad)),
            meal("b", "2026-03-03T08:00:00Z", "pizza ", Some(Bad)),
            meal("c", "2026-03-04T08:00:00Z", "PIZZA", Some(VeryBad)),
        ];
        let report = report(&logs);
        assert_eq!(report.triggers.len(), 1);
        assert_eq!(report.triggers[0].food_name, "Pizza");
        assert_eq!(report.triggers[0].occurrences, 3);
    }

    #[test]
    fn malformed_meals_are_skipped() {
        let mut logs = meals_of("Toast", &[Good, Good, Good]);
        logs.push(meal("blank", "2026-03-05T08:00:00Z", "", Some(Bad)));
        assert_eq!(food_correlations(&logs).len(), 1);
        assert_eq!(report(&logs).safe.len(), 1);
    }

    #[test]
    fn empty_input_gives_empty_report() {
        assert_eq!(report(&[]), SensitivityReport::default());
    }

    // ========== symptom_correlations ==========

    #[test]
    fn symptom_correlations_average_intensity_and_delay() {
        let meals = vec![
            meal("m1", "2026-03-02T12:00:00Z", "Pizza", None),
            meal("m2", "2026-03-03T12:00:00Z", "Pizza", None),
            meal("m3", "2026-03-04T12:00:00Z", "Salad", None),
        ];
        let symptoms = vec![
            symptom("s1", SymptomType::Bloating, 2, 1.0, Some("m1")),
            symptom("s2", SymptomType::Bloating, 4, 3.0, Some("m2")),
            symptom("s3", SymptomType::Bloating, 1, 0.5, Some("m3")),
            symptom("s4", SymptomType::Headache, 3, 6.0, Some("m3")),
        ];

        let correlations = symptom_correlations(&symptoms, &meals);

        let bloating = &correlations[&SymptomType::Bloating];
        assert_eq!(bloating.len(), 2);
        assert_eq!(bloating[0].food_name, "Pizza");
        assert_eq!(bloating[0].occurrences, 2);
        assert!((bloating[0].avg_intensity - 3.0).abs() < 1e-9);
        assert!((bloating[0].avg_delay_hours - 2.0).abs() < 1e-9);
        assert_eq!(bloating[1].food_name, "Salad");

        let headache = &correlations[&SymptomType::Headache];
        assert_eq!(headache.len(), 1);
        assert_eq!(headache[0].occurrences, 1);
    }

    #[test]
    fn dangling_and_unlinked_symptoms_are_skipped() {
        let meals = vec![meal("m1", "2026-03-02T12:00:00Z", "Pizza", None)];
        let symptoms = vec![
            symptom("s1", SymptomType::Nausea, 3, 1.0, Some("deleted-meal")),
            symptom("s2", SymptomType::Nausea, 3, 1.0, None),
            symptom("s3", SymptomType::Nausea, 9, 1.0, Some("m1")),
        ];
        assert!(symptom_correlations(&symptoms, &meals).is_empty());
    }

    #[test]
    fn trigger_foods_use_looser_threshold_across_symptoms() {
        let meals = vec![
            meal("m1", "2026-03-02T12:00:00Z", "Peanut Butter", None),
            meal("m2", "2026-03-03T12:00:00Z", "Peanut Butter", None),
            meal("m3", "2026-03-04T12:00:00Z", "Bread", None),
        ];
        let symptoms = vec![
            symptom("s1", SymptomType::SkinReaction, 3, 1.0, Some("m1")),
            symptom("s2", SymptomType::SkinReaction, 4, 1.5, Some("m2")),
            symptom("s3", SymptomType::Gas, 2, 2.0, Some("m3")),
        ];

        let correlations = symptom_correlations(&symptoms, &meals);
        let triggers = trigger_foods(&correlations, &CorrelationConfig::default());

        assert_eq!(
            triggers.into_iter().collect::<Vec<_>>(),
            vec!["peanut butter".to_string()]
        );
    }
}
