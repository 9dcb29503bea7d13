//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hemrisk_core::PredictError;
use serde::Serialize;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<PredictError> for AppError {
    fn from(e: PredictError) -> Self {
        match e {
            // Caller-recoverable: series of the wrong length.
            PredictError::InputLength { .. } => AppError::BadRequest(e.to_string()),
            // An internal invariant broke; never coerced into a prediction.
            PredictError::ShapeMismatch { .. } => AppError::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
