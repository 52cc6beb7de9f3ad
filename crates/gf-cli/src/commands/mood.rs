//! Mood and delete commands for editing logged meals.

use std::io::Write;

use anyhow::Result;
use gf_core::{MealId, MoodLabel};
use gf_db::Database;

/// Attaches `mood` to a logged meal.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: &MealId,
    mood: MoodLabel,
) -> Result<()> {
    if !db.set_meal_mood(id, Some(mood))? {
        anyhow::bail!("no meal with ID {id}");
    }
    writeln!(writer, "Recorded mood {mood} for meal {id}")?;
    Ok(())
}

/// Deletes a logged meal. Linked symptoms stay behind and are ignored by analysis.
pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: &MealId) -> Result<()> {
    if !db.delete_meal(id)? {
        anyhow::bail!("no meal with ID {id}");
    }
    writeln!(writer, "Deleted meal {id}")?;
    Ok(())
}
