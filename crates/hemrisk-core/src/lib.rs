use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Exactly 3 time points are required.")]
    InputLength { got: usize },

    #[error("Feature width mismatch: encoder expects {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature Contract
// ─────────────────────────────────────────────────────────────────────────────

/// Width of the feature vector the encoder consumes per time step.
pub const FEATURE_COUNT: usize = 7;

/// Required number of time points per input series.
pub const SEQUENCE_LEN: usize = 3;

/// Prothrombin time is not collected at the boundary; every time step
/// carries this fixed value at feature position 3.
pub const PROTHROMBIN_TIME_PT: f32 = 12.0;

/// Fibrinogen is likewise fixed, at feature position 6.
pub const FIBRINOGEN: f32 = 300.0;

/// Per-feature scaling bounds, in feature order. Every `hi` differs from
/// its `lo`, so the affine rescale never divides by zero.
pub const FEATURE_LO: [f32; FEATURE_COUNT] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
pub const FEATURE_HI: [f32; FEATURE_COUNT] = [
    20.0,   // Hemoglobin
    60.0,   // Hematocrit
    1000.0, // Platelet_Count
    100.0,  // ProthrombinTime
    10.0,   // INR_PT
    200.0,  // PTT
    1000.0, // Fibrinogen
];

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One observation point of the clinical series, as supplied by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimePoint {
    #[serde(rename = "Hemoglobin")]
    pub hemoglobin: f32,
    #[serde(rename = "Hematocrit")]
    pub hematocrit: f32,
    #[serde(rename = "Platelet_Count")]
    pub platelet_count: f32,
    #[serde(rename = "INR_PT")]
    pub inr_pt: f32,
    #[serde(rename = "PTT")]
    pub ptt: f32,
}

impl TimePoint {
    /// Full feature vector for this observation: the five measured values
    /// merged with the two fixed constants, in encoder feature order.
    /// Position is the contract here; the model never sees field names.
    pub fn to_features(&self) -> [f32; FEATURE_COUNT] {
        [
            self.hemoglobin,
            self.hematocrit,
            self.platelet_count,
            PROTHROMBIN_TIME_PT,
            self.inr_pt,
            self.ptt,
            FIBRINOGEN,
        ]
    }
}

/// Validates the series length and assembles one feature row per step.
///
/// Rejects before any row is built, so a bad-length series never reaches
/// the scaler or the encoder.
pub fn assemble_sequence(
    points: &[TimePoint],
) -> Result<Vec<[f32; FEATURE_COUNT]>, PredictError> {
    if points.len() != SEQUENCE_LEN {
        return Err(PredictError::InputLength { got: points.len() });
    }
    Ok(points.iter().map(TimePoint::to_features).collect())
}

/// The two task probabilities, each in (0,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScores {
    pub hemorrhage: f32,
    pub icu_admission: f32,
}
