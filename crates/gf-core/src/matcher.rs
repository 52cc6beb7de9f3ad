//! Safe/caution/avoid verdicts for food and dish names.
//!
//! Used for meals before they are logged and for dish lines pulled out of
//! scanned menu text. Matching is a case-insensitive substring test, so a
//! trigger of `peanut` flags "Peanut Noodles" and "Thai peanut salad" alike.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::Confidence;

/// Allergens that always earn a caution verdict.
pub const DEFAULT_ALLERGENS: &[&str] = &["dairy", "gluten", "lactose", "milk", "cheese", "wheat"];

/// Words that mark a menu line as a dish even without a price.
const FOOD_KEYWORDS: &[&str] = &[
    "burger", "pizza", "pasta", "salad", "chicken", "beef", "fish", "sandwich", "soup", "rice",
    "noodle", "steak", "taco", "wrap", "bowl",
];

/// Menu lines shorter than this are noise (page numbers, stray OCR marks).
const MIN_ITEM_CHARS: usize = 5;

const AVOID_CONFIDENCE: Confidence = Confidence::clamped(0.8);
const DEFAULT_CONFIDENCE: Confidence = Confidence::clamped(0.5);

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(appetizer|entree|dessert|drink|menu|price)").unwrap()
});

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s?\d+(?:[.,]\d{1,2})?").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Safe,
    Caution,
    Avoid,
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Avoid => "avoid",
        };
        write!(f, "{s}")
    }
}

/// Classification of a single item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerVerdict {
    pub item_name: String,
    pub status: VerdictStatus,
    /// Every trigger (for `avoid`) or allergen (for `caution`) found in the name.
    pub matched_terms: BTreeSet<String>,
    pub confidence: Confidence,
}

/// Terms from `terms` that occur in `haystack`, lowercased. Blank terms never match.
fn matching_terms<'a, I>(haystack: &str, terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    terms
        .into_iter()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty() && haystack.contains(term.as_str()))
        .collect()
}

/// Classifies `item_name` against personal triggers and allergens.
///
/// Any trigger match means `avoid` (confidence 0.8). Otherwise a match against
/// `known_allergens` or [`DEFAULT_ALLERGENS`] means `caution` (0.5). Anything
/// else is `safe` (0.5).
pub fn classify(
    item_name: &str,
    trigger_foods: &BTreeSet<String>,
    known_allergens: &BTreeSet<String>,
) -> TriggerVerdict {
    let haystack = item_name.to_lowercase();

    let triggers = matching_terms(&haystack, trigger_foods.iter().map(String::as_str));
    if !triggers.is_empty() {
        return TriggerVerdict {
            item_name: item_name.to_string(),
            status: VerdictStatus::Avoid,
            matched_terms: triggers,
            confidence: AVOID_CONFIDENCE,
        };
    }

    let allergens = matching_terms(
        &haystack,
        known_allergens
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_ALLERGENS.iter().copied()),
    );
    if !allergens.is_empty() {
        return TriggerVerdict {
            item_name: item_name.to_string(),
            status: VerdictStatus::Caution,
            matched_terms: allergens,
            confidence: DEFAULT_CONFIDENCE,
        };
    }

    TriggerVerdict {
        item_name: item_name.to_string(),
        status: VerdictStatus::Safe,
        matched_terms: BTreeSet::new(),
        confidence: DEFAULT_CONFIDENCE,
    }
}

/// Pulls likely dish names out of raw menu text.
///
/// A line is kept when it is at least five characters long, is not a section
/// header, and either carries a price or mentions a common dish word. Prices
/// are stripped from the returned names.
///
/// A price may have one space after the `$` (`$ 11`). Runs of whitespace left
/// inside a name collapse to a single space.
pub fn extract_candidate_items(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_ITEM_CHARS)
        .filter(|line| !HEADER_RE.is_match(line))
        .filter_map(|line| {
            let has_price = PRICE_RE.is_match(line);
            let lower = line.to_lowercase();
            let has_keyword = FOOD_KEYWORDS.iter().any(|word| lower.contains(word));
            if !has_price && !has_keyword {
                return None;
            }
            let name = PRICE_RE.replace_all(line, "");
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Extracts candidate dishes from menu text and classifies each one.
pub fn scan_menu(
    raw_text: &str,
    trigger_foods: &BTreeSet<String>,
    known_allergens: &BTreeSet<String>,
) -> Vec<TriggerVerdict> {
    let verdicts: Vec<TriggerVerdict> = extract_candidate_items(raw_text)
        .iter()
        .map(|item| classify(item, trigger_foods, known_allergens))
        .collect();
    tracing::debug!(items = verdicts.len(), "scanned menu text");
    verdicts
}
