use hemrisk_core::TimePoint;
use serde::{Deserialize, Serialize};

// === HTTP DTOs ===

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub time_series: Vec<TimePoint>,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub hemorrhage_risk: f64,
    pub icu_admission_risk: f64,
}
