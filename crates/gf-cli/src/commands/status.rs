//! Status command for showing what the journal holds.

use std::io::Write;

use anyhow::{Context, Result};

use gf_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let counts = db.counts()?;

    writeln!(writer, "Food journal status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    if counts.meals == 0 && counts.symptoms == 0 {
        writeln!(writer, "No meals or symptoms recorded.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "Meals: {} ({} without a mood)",
        counts.meals, counts.unlabeled_meals
    )?;
    writeln!(writer, "Symptoms: {}", counts.symptoms)?;
    if let Some(latest) = counts.latest_meal {
        writeln!(writer, "Last meal: {latest}")?;
    }

    Ok(())
}
