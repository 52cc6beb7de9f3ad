//! Check command: safe, caution or avoid for a single food or dish.

use std::collections::BTreeSet;

use anyhow::Result;
use gf_core::{Snapshot, TriggerVerdict, VerdictStatus, classify};
use gf_db::Database;

use super::util::derived_triggers;
use crate::Config;

/// One line describing a verdict, shared with the menu scanner.
pub fn verdict_line(verdict: &TriggerVerdict) -> String {
    let label = match verdict.status {
        VerdictStatus::Safe => "SAFE",
        VerdictStatus::Caution => "CAUTION",
        VerdictStatus::Avoid => "AVOID",
    };
    if verdict.matched_terms.is_empty() {
        format!("{label:<7}  {}", verdict.item_name)
    } else {
        let terms: Vec<&str> = verdict.matched_terms.iter().map(String::as_str).collect();
        format!("{label:<7}  {} (matches: {})", verdict.item_name, terms.join(", "))
    }
}

pub fn generate_check_data(
    item: &str,
    trigger_foods: &BTreeSet<String>,
    known_allergens: &BTreeSet<String>,
) -> TriggerVerdict {
    classify(item.trim(), trigger_foods, known_allergens)
}

/// Formats a verdict as JSON.
pub fn format_check_json(verdict: &TriggerVerdict) -> Result<String> {
    Ok(serde_json::to_string_pretty(verdict)?)
}

// ========== Public Interface ==========

/// Runs the check command against symptom-derived triggers and configured allergens.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    item: &str,
    json: bool,
) -> Result<()> {
    if item.trim().is_empty() {
        anyhow::bail!("nothing to check: the food name is blank");
    }

    let snapshot = Snapshot::capture(db)?;
    let triggers = derived_triggers(&snapshot, &config.analysis.correlation);
    let verdict = generate_check_data(item, &triggers, &config.allergens());

    if json {
        writeln!(writer, "{}", format_check_json(&verdict)?)?;
    } else {
        writeln!(writer, "{}", verdict_line(&verdict))?;
    }
    Ok(())
}
