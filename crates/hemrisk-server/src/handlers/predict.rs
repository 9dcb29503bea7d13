use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::dto::{PredictionRequest, PredictionResponse};
use crate::error::AppError;
use crate::services;
use crate::state::ServerState;

pub async fn predict(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    let response = services::prediction::run(&state, &req)?;
    info!(
        hemorrhage_risk = response.hemorrhage_risk,
        icu_admission_risk = response.icu_admission_risk,
        "Prediction served"
    );
    Ok(Json(response))
}
