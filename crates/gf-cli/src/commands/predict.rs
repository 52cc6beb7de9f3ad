//! Predict command: how a food is likely to feel, based on past meals.

use std::fmt::Write;

use anyhow::Result;
use gf_core::{MealLog, MoodPrediction, Prediction, Snapshot, predict_mood};
use gf_db::Database;
use serde::Serialize;

/// Computed prediction for one food.
#[derive(Debug, Serialize)]
pub struct PredictData {
    pub food: String,
    #[serde(flatten)]
    pub prediction: MoodPrediction,
}

pub fn generate_predict_data(food: &str, meals: &[MealLog]) -> PredictData {
    PredictData {
        food: food.trim().to_string(),
        prediction: predict_mood(food, meals),
    }
}

/// Formats the human-readable prediction.
pub fn format_predict(data: &PredictData) -> String {
    let mut output = String::new();
    let prediction = &data.prediction;

    if prediction.prediction == Prediction::Unknown {
        writeln!(output, "No past meals match \"{}\".", data.food).unwrap();
        return output;
    }

    let meals = if prediction.sample_size == 1 {
        "1 past meal".to_string()
    } else {
        format!("{} past meals", prediction.sample_size)
    };
    writeln!(
        output,
        "{}: likely {} ({}% confidence, {meals})",
        data.food, prediction.prediction, prediction.confidence
    )
    .unwrap();

    output
}

/// Formats the prediction as JSON.
pub fn format_predict_json(data: &PredictData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ========== Public Interface ==========

/// Runs the predict command.
pub fn run<W: std::io::Write>(writer: &mut W, db: &Database, food: &str, json: bool) -> Result<()> {
    let snapshot = Snapshot::capture(db)?;
    let data = generate_predict_data(food, &snapshot.meals);

    if json {
        writeln!(writer, "{}", format_predict_json(&data)?)?;
    } else {
        write!(writer, "{}", format_predict(&data))?;
    }
    Ok(())
}
