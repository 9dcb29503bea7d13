pub mod predict;

use axum::Json;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "ICU Admission and Hemorrhage Risk Prediction API"
    }))
}
