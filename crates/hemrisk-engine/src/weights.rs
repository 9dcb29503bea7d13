//! Trained model artifact: on-disk layout, loading, shape validation.
//!
//! The artifact is a JSON document holding the declared architecture and
//! one flat buffer per weight matrix, exported from the training run in
//! the encoder's native per-layer ordering.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model artifact shape mismatch: {0}")]
    Shape(String),
}

/// One stacked layer's parameters. `w_ih` is `(4 * hidden) x input` and
/// `w_hh` is `(4 * hidden) x hidden`, both row-major, gate rows in the
/// order input, forget, cell, output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerWeights {
    pub w_ih: Vec<f32>,
    pub w_hh: Vec<f32>,
    pub b_ih: Vec<f32>,
    pub b_hh: Vec<f32>,
}

/// One scoring head: a `hidden`-wide projection row and its bias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadWeights {
    pub weight: Vec<f32>,
    pub bias: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelWeights {
    pub input_size: usize,
    pub hidden_size: usize,
    pub num_layers: usize,
    pub layers: Vec<LayerWeights>,
    pub hemorrhage_head: HeadWeights,
    pub icu_head: HeadWeights,
}

impl ModelWeights {
    /// Reads and validates a JSON artifact. Any failure here must keep the
    /// process from serving.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let content = fs::read_to_string(path)?;
        let weights: ModelWeights = serde_json::from_str(&content)?;
        weights.validate()?;
        Ok(weights)
    }

    /// Checks every buffer length against the declared dimensions.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.num_layers == 0 || self.hidden_size == 0 || self.input_size == 0 {
            return Err(ModelLoadError::Shape(
                "declared dimensions must be non-zero".into(),
            ));
        }
        if self.layers.len() != self.num_layers {
            return Err(ModelLoadError::Shape(format!(
                "declared {} layers, artifact holds {}",
                self.num_layers,
                self.layers.len()
            )));
        }

        let gate_rows = 4 * self.hidden_size;
        for (l, layer) in self.layers.iter().enumerate() {
            let input = if l == 0 {
                self.input_size
            } else {
                self.hidden_size
            };
            if layer.w_ih.len() != gate_rows * input {
                return Err(ModelLoadError::Shape(format!(
                    "layer {l}: w_ih holds {} values, expected {}",
                    layer.w_ih.len(),
                    gate_rows * input
                )));
            }
            if layer.w_hh.len() != gate_rows * self.hidden_size {
                return Err(ModelLoadError::Shape(format!(
                    "layer {l}: w_hh holds {} values, expected {}",
                    layer.w_hh.len(),
                    gate_rows * self.hidden_size
                )));
            }
            if layer.b_ih.len() != gate_rows || layer.b_hh.len() != gate_rows {
                return Err(ModelLoadError::Shape(format!(
                    "layer {l}: bias vectors must hold {gate_rows} values"
                )));
            }
        }

        for (name, head) in [
            ("hemorrhage_head", &self.hemorrhage_head),
            ("icu_head", &self.icu_head),
        ] {
            if head.weight.len() != self.hidden_size {
                return Err(ModelLoadError::Shape(format!(
                    "{name}: weight holds {} values, expected {}",
                    head.weight.len(),
                    self.hidden_size
                )));
            }
        }

        Ok(())
    }
}
