//! Mood labels and the positive/negative outcome buckets derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A mood recorded against a meal.
///
/// Variants are declared worst-to-best so the derived ordering can be used
/// as a stable map key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoodLabel {
    VeryBad,
    Bad,
    Neutral,
    Good,
    FeelOk,
}

/// Outcome bucket used by every ratio in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodBucket {
    Positive,
    Negative,
    Neutral,
}

impl MoodLabel {
    /// All labels in declaration order.
    pub const ALL: [Self; 5] = [
        Self::VeryBad,
        Self::Bad,
        Self::Neutral,
        Self::Good,
        Self::FeelOk,
    ];

    /// Canonical string form used for storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryBad => "very_bad",
            Self::Bad => "bad",
            Self::Neutral => "neutral",
            Self::Good => "good",
            Self::FeelOk => "feel_ok",
        }
    }

    /// Classifies the label for ratio purposes.
    ///
    /// `Good` and `FeelOk` are positive, `VeryBad` and `Bad` are negative,
    /// `Neutral` belongs to neither.
    #[must_use]
    pub const fn bucket(self) -> MoodBucket {
        match self {
            Self::Good | Self::FeelOk => MoodBucket::Positive,
            Self::VeryBad | Self::Bad => MoodBucket::Negative,
            Self::Neutral => MoodBucket::Neutral,
        }
    }
}

/// Buckets an optional mood; an unlabeled meal is neutral.
pub const fn bucket_of(mood: Option<MoodLabel>) -> MoodBucket {
    match mood {
        Some(label) => label.bucket(),
        None => MoodBucket::Neutral,
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "very_bad" | "verybad" | "very-bad" => Ok(Self::VeryBad),
            "bad" => Ok(Self::Bad),
            "neutral" => Ok(Self::Neutral),
            "good" => Ok(Self::Good),
            "feel_ok" | "feelok" | "feel-ok" | "ok" => Ok(Self::FeelOk),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

impl Serialize for MoodLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MoodLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown mood strings.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(String);
