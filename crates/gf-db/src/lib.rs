//! Storage layer for food, mood and symptom logs.
//!
//! Provides a SQLite-backed [`LogStore`] using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared across
//! threads without external synchronization. Analysis never needs to share it: take a
//! [`gf_core::Snapshot`] and hand its slices to the engine.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC with millisecond precision
//! (e.g., `2026-03-02T08:30:00.000Z`), so lexicographic order matches
//! chronological order and range queries can compare strings directly.
//!
//! ## Enumerations
//!
//! `meals.mood` and `symptoms.symptom_type` hold the snake_case names used by
//! `gf_core` serialization (`very_bad`, `brain_fog`, ...). A NULL mood means the
//! meal has not been labeled yet.
//!
//! ## Meal Links
//!
//! `symptoms.linked_meal_id` is not a foreign key. Deleting a meal
//! leaves its symptoms in place with a dangling link, which the engine skips.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use gf_core::{LogStore, MealId, MealLog, MoodLabel, SymptomId, SymptomLog, SymptomType};
use rusqlite::{Connection, Row, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for record {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored column could not be turned into a domain value.
    #[error("invalid record {record_id}: {message}")]
    InvalidRecord { record_id: String, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Number of stored records, for status output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub meals: usize,
    pub unlabeled_meals: usize,
    pub symptoms: usize,
    /// Timestamp of the most recent meal, as stored.
    pub latest_meal: Option<String>,
}

/// A `meals` row before validation.
struct MealRow {
    id: String,
    timestamp: String,
    food_name: String,
    calories: i64,
    protein_grams: f64,
    carbs_grams: f64,
    fats_grams: f64,
    mood: Option<String>,
}

/// A `symptoms` row before validation.
struct SymptomRow {
    id: String,
    timestamp: String,
    symptom_type: String,
    intensity: i64,
    hours_after_meal: f64,
    linked_meal_id: Option<String>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- timestamp: RFC 3339 UTC (e.g., '2026-03-02T08:30:00.000Z')
            -- mood: snake_case MoodLabel, NULL until labeled
            CREATE TABLE IF NOT EXISTS meals (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                food_name TEXT NOT NULL,
                calories INTEGER NOT NULL DEFAULT 0,
                protein_grams REAL NOT NULL DEFAULT 0,
                carbs_grams REAL NOT NULL DEFAULT 0,
                fats_grams REAL NOT NULL DEFAULT 0,
                mood TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_meals_timestamp ON meals(timestamp);

            -- linked_meal_id: non-owning reference to meals(id), never cascaded
            CREATE TABLE IF NOT EXISTS symptoms (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                symptom_type TEXT NOT NULL,
                intensity INTEGER NOT NULL,
                hours_after_meal REAL NOT NULL DEFAULT 0,
                linked_meal_id TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_symptoms_timestamp ON symptoms(timestamp);
            CREATE INDEX IF NOT EXISTS idx_symptoms_meal ON symptoms(linked_meal_id);
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of meals, ignoring duplicates by ID.
    pub fn insert_meals(&mut self, meals: &[MealLog]) -> Result<usize, DbError> {
        if meals.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO meals
                (id, timestamp, food_name, calories, protein_grams, carbs_grams, fats_grams, mood)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for meal in meals {
                inserted += stmt.execute(params![
                    meal.id.as_str(),
                    format_timestamp(meal.timestamp),
                    meal.food_name,
                    meal.calories,
                    meal.protein_grams,
                    meal.carbs_grams,
                    meal.fats_grams,
                    meal.mood.map(MoodLabel::as_str),
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(inserted, requested = meals.len(), "inserted meals");
        Ok(inserted)
    }

    /// Inserts a batch of symptoms, ignoring duplicates by ID.
    ///
    /// Linked meal IDs are stored as given; they are not checked against `meals`.
    pub fn insert_symptoms(&mut self, symptoms: &[SymptomLog]) -> Result<usize, DbError> {
        if symptoms.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO symptoms
                (id, timestamp, symptom_type, intensity, hours_after_meal, linked_meal_id)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )?;
            for symptom in symptoms {
                inserted += stmt.execute(params![
                    symptom.id.as_str(),
                    format_timestamp(symptom.timestamp),
                    symptom.symptom_type.as_str(),
                    symptom.intensity,
                    symptom.hours_after_meal,
                    symptom.linked_meal_id.as_ref().map(MealId::as_str),
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(inserted, requested = symptoms.len(), "inserted symptoms");
        Ok(inserted)
    }

    /// Attaches (or with `None`, clears) the mood of a meal.
    ///
    /// Returns `false` if no meal has this ID.
    pub fn set_meal_mood(&mut self, id: &MealId, mood: Option<MoodLabel>) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE meals SET mood = ? WHERE id = ?",
            params![mood.map(MoodLabel::as_str), id.as_str()],
        )?;
        Ok(changed > 0)
    }

    /// Deletes a meal. Symptoms linked to it are left untouched.
    ///
    /// Returns `false` if no meal has this ID.
    pub fn delete_meal(&mut self, id: &MealId) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM meals WHERE id = ?", [id.as_str()])?;
        Ok(changed > 0)
    }

    /// Lists all meals ordered by timestamp then ID.
    ///
    /// Rows that fail to decode are logged and skipped.
    pub fn list_meals(&self) -> Result<Vec<MealLog>, DbError> {
        self.query_meals(
            "
            SELECT id, timestamp, food_name, calories, protein_grams, carbs_grams, fats_grams, mood
            FROM meals
            ORDER BY timestamp ASC, id ASC
            ",
            [],
        )
    }

    /// Lists all symptoms ordered by timestamp then ID.
    ///
    /// Rows that fail to decode are logged and skipped.
    pub fn list_symptoms(&self) -> Result<Vec<SymptomLog>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, timestamp, symptom_type, intensity, hours_after_meal, linked_meal_id
            FROM symptoms
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SymptomRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                symptom_type: row.get(2)?,
                intensity: row.get(3)?,
                hours_after_meal: row.get(4)?,
                linked_meal_id: row.get(5)?,
            })
        })?;
        let mut symptoms = Vec::new();
        for row in rows {
            match decode_symptom(row?) {
                Ok(symptom) => symptoms.push(symptom),
                Err(err) => tracing::warn!(error = %err, "skipping undecodable symptom row"),
            }
        }
        Ok(symptoms)
    }

    /// Counts stored records.
    pub fn counts(&self) -> Result<RecordCounts, DbError> {
        let (meals, unlabeled_meals, latest_meal): (i64, i64, Option<String>) =
            self.conn.query_row(
                "SELECT COUNT(*), COUNT(*) - COUNT(mood), MAX(timestamp) FROM meals",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;
        let symptoms: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM symptoms", [], |row| row.get(0))?;
        Ok(RecordCounts {
            meals: count_to_usize(meals),
            unlabeled_meals: count_to_usize(unlabeled_meals),
            symptoms: count_to_usize(symptoms),
            latest_meal,
        })
    }

    fn query_meals<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<MealLog>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, meal_row)?;
        let mut meals = Vec::new();
        for row in rows {
            match decode_meal(row?) {
                Ok(meal) => meals.push(meal),
                Err(err) => tracing::warn!(error = %err, "skipping undecodable meal row"),
            }
        }
        Ok(meals)
    }
}

impl LogStore for Database {
    type Error = DbError;

    fn meal_logs(&self) -> Result<Vec<MealLog>, Self::Error> {
        self.list_meals()
    }

    fn symptom_logs(&self) -> Result<Vec<SymptomLog>, Self::Error> {
        self.list_symptoms()
    }
}

fn meal_row(row: &Row<'_>) -> rusqlite::Result<MealRow> {
    Ok(MealRow {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        food_name: row.get(2)?,
        calories: row.get(3)?,
        protein_grams: row.get(4)?,
        carbs_grams: row.get(5)?,
        fats_grams: row.get(6)?,
        mood: row.get(7)?,
    })
}

fn decode_meal(row: MealRow) -> Result<MealLog, DbError> {
    let timestamp = parse_timestamp(&row.timestamp, &row.id)?;
    let calories = u32::try_from(row.calories)
        .map_err(|_| invalid(&row.id, format!("calories out of range: {}", row.calories)))?;
    let mood = row
        .mood
        .as_deref()
        .map(str::parse::<MoodLabel>)
        .transpose()
        .map_err(|err| invalid(&row.id, err.to_string()))?;
    let id = MealId::new(row.id.as_str()).map_err(|err| invalid(&row.id, err.to_string()))?;

    Ok(MealLog {
        id,
        timestamp,
        food_name: row.food_name,
        calories,
        protein_grams: row.protein_grams,
        carbs_grams: row.carbs_grams,
        fats_grams: row.fats_grams,
        mood,
    })
}

fn decode_symptom(row: SymptomRow) -> Result<SymptomLog, DbError> {
    let timestamp = parse_timestamp(&row.timestamp, &row.id)?;
    let symptom_type = row
        .symptom_type
        .parse::<SymptomType>()
        .map_err(|err| invalid(&row.id, err.to_string()))?;
    let intensity = u8::try_from(row.intensity)
        .map_err(|_| invalid(&row.id, format!("intensity out of range: {}", row.intensity)))?;
    let linked_meal_id = row
        .linked_meal_id
        .map(MealId::new)
        .transpose()
        .map_err(|err| invalid(&row.id, err.to_string()))?;
    let id = SymptomId::new(row.id.as_str()).map_err(|err| invalid(&row.id, err.to_string()))?;

    Ok(SymptomLog {
        id,
        timestamp,
        symptom_type,
        intensity,
        hours_after_meal: row.hours_after_meal,
        linked_meal_id,
    })
}

fn invalid(record_id: &str, message: String) -> DbError {
    DbError::InvalidRecord {
        record_id: record_id.to_string(),
        message,
    }
}

fn parse_timestamp(timestamp: &str, record_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn count_to_usize(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}
