//! The read interface the engine needs from whatever persists the logs.

use crate::log::{MealLog, SymptomLog};

/// Source of meal and symptom logs.
///
/// Implementations own persistence and any locking around it. The engine only
/// reads, and only through a [`Snapshot`].
pub trait LogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every meal, oldest first.
    fn meal_logs(&self) -> Result<Vec<MealLog>, Self::Error>;

    /// Every symptom, oldest first.
    fn symptom_logs(&self) -> Result<Vec<SymptomLog>, Self::Error>;
}

/// A copy of both log collections taken at one point in time.
///
/// Analyzers borrow slices from a snapshot, so a report never observes writes
/// that land while it is being computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub meals: Vec<MealLog>,
    pub symptoms: Vec<SymptomLog>,
}

impl Snapshot {
    /// Reads both collections from `store`.
    pub fn capture<S: LogStore>(store: &S) -> Result<Self, S::Error> {
        let meals = store.meal_logs()?;
        let symptoms = store.symptom_logs()?;
        tracing::debug!(
            meals = meals.len(),
            symptoms = symptoms.len(),
            "captured log snapshot"
        );
        Ok(Self { meals, symptoms })
    }
}
