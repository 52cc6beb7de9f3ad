//! Scan-menu command: classifies every dish found in pasted or OCR'd menu text.

use std::collections::BTreeSet;
use std::fmt::Write;

use anyhow::Result;
use gf_core::{Snapshot, TriggerVerdict, VerdictStatus, scan_menu};
use gf_db::Database;
use serde::Serialize;

use super::check::verdict_line;
use super::util::derived_triggers;
use crate::Config;

/// Verdicts for one menu, with counts per status.
#[derive(Debug, Serialize)]
pub struct ScanData {
    pub items: Vec<TriggerVerdict>,
    pub safe: usize,
    pub caution: usize,
    pub avoid: usize,
}

pub fn generate_scan_data(
    raw_text: &str,
    trigger_foods: &BTreeSet<String>,
    known_allergens: &BTreeSet<String>,
) -> ScanData {
    let items = scan_menu(raw_text, trigger_foods, known_allergens);
    let count = |status: VerdictStatus| items.iter().filter(|item| item.status == status).count();
    ScanData {
        safe: count(VerdictStatus::Safe),
        caution: count(VerdictStatus::Caution),
        avoid: count(VerdictStatus::Avoid),
        items,
    }
}

/// Formats the human-readable menu report.
pub fn format_scan(data: &ScanData) -> String {
    let mut output = String::new();

    if data.items.is_empty() {
        writeln!(output, "No dishes found in the menu text.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Dishes are lines with a price like $12.50 or a word like salad or burger."
        )
        .unwrap();
        return output;
    }

    for item in &data.items {
        writeln!(output, "{}", verdict_line(item)).unwrap();
    }
    writeln!(output).unwrap();
    writeln!(
        output,
        "{} safe, {} caution, {} avoid",
        data.safe, data.caution, data.avoid
    )
    .unwrap();

    output
}

/// Formats menu verdicts as JSON.
pub fn format_scan_json(data: &ScanData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the scan-menu command on already-read menu text.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    raw_text: &str,
    json: bool,
) -> Result<()> {
    let snapshot = Snapshot::capture(db)?;
    let triggers = derived_triggers(&snapshot, &config.analysis.correlation);
    let data = generate_scan_data(raw_text, &triggers, &config.allergens());

    if json {
        writeln!(writer, "{}", format_scan_json(&data)?)?;
    } else {
        write!(writer, "{}", format_scan(&data))?;
    }
    Ok(())
}
