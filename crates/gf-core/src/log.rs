//! Meal and symptom log records supplied by the log store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mood::MoodLabel;
use crate::types::{MealId, SymptomId};

/// A confirmed meal.
///
/// Immutable once logged except for `mood`, which may be attached later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLog {
    pub id: MealId,
    pub timestamp: DateTime<Utc>,
    pub food_name: String,
    pub calories: u32,
    #[serde(default)]
    pub protein_grams: f64,
    #[serde(default)]
    pub carbs_grams: f64,
    #[serde(default)]
    pub fats_grams: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodLabel>,
}

impl MealLog {
    /// Creates a meal with zero macros and no mood.
    pub fn new(
        id: MealId,
        timestamp: DateTime<Utc>,
        food_name: impl Into<String>,
        calories: u32,
    ) -> Self {
        Self {
            id,
            timestamp,
            food_name: food_name.into(),
            calories,
            protein_grams: 0.0,
            carbs_grams: 0.0,
            fats_grams: 0.0,
            mood: None,
        }
    }

    /// Sets protein, carbs and fats in grams.
    #[must_use]
    pub fn with_macros(mut self, protein: f64, carbs: f64, fats: f64) -> Self {
        self.protein_grams = protein;
        self.carbs_grams = carbs;
        self.fats_grams = fats;
        self
    }

    /// Attaches a mood.
    #[must_use]
    pub fn with_mood(mut self, mood: MoodLabel) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Returns `false` for records every analyzer must skip: a blank food name
    /// or a negative/non-finite macro.
    pub fn is_well_formed(&self) -> bool {
        !self.food_name.trim().is_empty()
            && [self.protein_grams, self.carbs_grams, self.fats_grams]
                .iter()
                .all(|grams| grams.is_finite() && *grams >= 0.0)
    }

    /// Grouping key for the food: trimmed and lowercased.
    pub(crate) fn food_key(&self) -> String {
        self.food_name.trim().to_lowercase()
    }
}

/// A physical symptom, optionally linked to the meal it followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomLog {
    pub id: SymptomId,
    pub timestamp: DateTime<Utc>,
    pub symptom_type: SymptomType,
    /// Severity from 1 (barely noticeable) to 5 (severe).
    pub intensity: u8,
    #[serde(default)]
    pub hours_after_meal: f64,
    /// Non-owning back-reference. May dangle if the meal was deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_meal_id: Option<MealId>,
}

impl SymptomLog {
    /// Returns `false` when intensity is outside `1..=5` or the delay is
    /// negative/non-finite.
    pub fn is_well_formed(&self) -> bool {
        (1..=5).contains(&self.intensity)
            && self.hours_after_meal.is_finite()
            && self.hours_after_meal >= 0.0
    }
}

/// Kinds of symptom a user can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymptomType {
    Bloating,
    Cramps,
    Gas,
    Nausea,
    Heartburn,
    Diarrhea,
    Constipation,
    Headache,
    Fatigue,
    BrainFog,
    SkinReaction,
    Other,
}

impl SymptomType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bloating => "bloating",
            Self::Cramps => "cramps",
            Self::Gas => "gas",
            Self::Nausea => "nausea",
            Self::Heartburn => "heartburn",
            Self::Diarrhea => "diarrhea",
            Self::Constipation => "constipation",
            Self::Headache => "headache",
            Self::Fatigue => "fatigue",
            Self::BrainFog => "brain_fog",
            Self::SkinReaction => "skin_reaction",
            Self::Other => "other",
        }
    }

    /// Capitalized form for insight text.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bloating => "Bloating",
            Self::Cramps => "Cramps",
            Self::Gas => "Gas",
            Self::Nausea => "Nausea",
            Self::Heartburn => "Heartburn",
            Self::Diarrhea => "Diarrhea",
            Self::Constipation => "Constipation",
            Self::Headache => "Headache",
            Self::Fatigue => "Fatigue",
            Self::BrainFog => "Brain fog",
            Self::SkinReaction => "Skin reaction",
            Self::Other => "Other symptom",
        }
    }
}

impl fmt::Display for SymptomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SymptomType {
    type Err = UnknownSymptomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "bloating" => Ok(Self::Bloating),
            "cramps" | "cramping" => Ok(Self::Cramps),
            "gas" => Ok(Self::Gas),
            "nausea" => Ok(Self::Nausea),
            "heartburn" | "reflux" => Ok(Self::Heartburn),
            "diarrhea" => Ok(Self::Diarrhea),
            "constipation" => Ok(Self::Constipation),
            "headache" => Ok(Self::Headache),
            "fatigue" => Ok(Self::Fatigue),
            "brain_fog" => Ok(Self::BrainFog),
            "skin_reaction" | "rash" => Ok(Self::SkinReaction),
            "other" => Ok(Self::Other),
            _ => Err(UnknownSymptomType(s.to_string())),
        }
    }
}

impl Serialize for SymptomType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SymptomType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown symptom type strings.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown symptom type: {0}")]
pub struct UnknownSymptomType(String);
