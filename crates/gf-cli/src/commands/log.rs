//! Log command for recording meals and symptoms.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gf_core::{MealId, MealLog, Snapshot, SymptomId, SymptomLog, VerdictStatus, classify};
use gf_db::Database;
use uuid::Uuid;

use super::util::{derived_triggers, parse_datetime};
use crate::Config;
use crate::cli::{MealArgs, SymptomArgs};

fn resolve_time(at: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    at.map(|s| parse_datetime(s, now))
        .transpose()
        .map(|parsed| parsed.unwrap_or(now))
}

/// Records a meal and warns if it matches a known trigger or allergen.
pub fn meal<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    args: &MealArgs,
    now: DateTime<Utc>,
) -> Result<MealId> {
    let timestamp = resolve_time(args.at.as_deref(), now)?;
    let id = MealId::new(Uuid::new_v4().to_string())?;

    let mut log = MealLog::new(id.clone(), timestamp, args.food.trim(), args.calories)
        .with_macros(args.protein, args.carbs, args.fats);
    log.mood = args.mood;
    if !log.is_well_formed() {
        anyhow::bail!("a meal needs a food name and non-negative protein, carbs and fats");
    }

    db.insert_meals(std::slice::from_ref(&log))
        .context("failed to store meal")?;
    tracing::debug!(meal_id = %id, food = %log.food_name, "logged meal");
    writeln!(
        writer,
        "Logged meal {id} ({}, {} kcal)",
        log.food_name, log.calories
    )?;

    let snapshot = Snapshot::capture(&*db)?;
    let triggers = derived_triggers(&snapshot, &config.analysis.correlation);
    let verdict = classify(&log.food_name, &triggers, &config.allergens());
    if verdict.status != VerdictStatus::Safe {
        let terms: Vec<&str> = verdict.matched_terms.iter().map(String::as_str).collect();
        writeln!(
            writer,
            "Heads up: {} is marked {} (matches: {})",
            log.food_name,
            verdict.status,
            terms.join(", ")
        )?;
    }

    Ok(id)
}

/// Records a symptom, optionally linked to the meal it followed.
pub fn symptom<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &SymptomArgs,
    now: DateTime<Utc>,
) -> Result<SymptomId> {
    let timestamp = resolve_time(args.at.as_deref(), now)?;
    let id = SymptomId::new(Uuid::new_v4().to_string())?;
    let log = SymptomLog {
        id: id.clone(),
        timestamp,
        symptom_type: args.kind,
        intensity: args.intensity,
        hours_after_meal: args.hours_after,
        linked_meal_id: args.meal.clone(),
    };
    if !log.is_well_formed() {
        anyhow::bail!("intensity must be 1-5 and hours after the meal must be zero or more");
    }

    db.insert_symptoms(std::slice::from_ref(&log))
        .context("failed to store symptom")?;
    tracing::debug!(symptom_id = %id, kind = %log.symptom_type, "logged symptom");
    writeln!(
        writer,
        "Logged symptom {id} ({}, intensity {})",
        log.symptom_type.display_name(),
        log.intensity
    )?;

    Ok(id)
}
