//! Prediction service: runs the engine and shapes presentation values.

use crate::dto::{PredictionRequest, PredictionResponse};
use crate::error::AppError;
use crate::state::ServerState;

/// Converts a probability in (0,1) to a percentage rounded to 2 decimals.
fn to_percent(probability: f32) -> f64 {
    (f64::from(probability) * 100.0 * 100.0).round() / 100.0
}

pub fn run(
    state: &ServerState,
    req: &PredictionRequest,
) -> Result<PredictionResponse, AppError> {
    let scores = state.engine.predict(&req.time_series)?;
    Ok(PredictionResponse {
        hemorrhage_risk: to_percent(scores.hemorrhage),
        icu_admission_risk: to_percent(scores.icu_admission),
    })
}
