//! Inference engine: feature scaling, the multi-task sequence model, and
//! the trained artifact the model is loaded from.

mod lstm;
mod scaler;
mod weights;

pub use lstm::MultiTaskLstm;
pub use scaler::MinMaxScaler;
pub use weights::{HeadWeights, LayerWeights, ModelLoadError, ModelWeights};

use std::path::Path;

use hemrisk_core::{assemble_sequence, PredictError, RiskScores, TimePoint, FEATURE_COUNT};
use tracing::info;

/// Encoder depth the service is trained and configured for.
pub const NUM_LAYERS: usize = 4;

/// Hidden width of every stacked layer.
pub const HIDDEN_SIZE: usize = 256;

/// The full inference pipeline behind the HTTP boundary: caller-supplied
/// time points are assembled into feature rows, scaled, and run through
/// the encoder and both scoring heads.
///
/// Built once at startup and read-only afterwards; share it behind an
/// `Arc` across concurrent requests without locking.
#[derive(Debug)]
pub struct RiskEngine {
    scaler: MinMaxScaler,
    model: MultiTaskLstm,
}

impl RiskEngine {
    /// Engine over an already-built network. The scaler always carries the
    /// clinical training bounds.
    pub fn new(model: MultiTaskLstm) -> Self {
        Self {
            scaler: MinMaxScaler::clinical(),
            model,
        }
    }

    /// Loads the trained artifact, refusing any artifact that does not
    /// match the configured architecture.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let weights = ModelWeights::load(&path)?;
        if weights.input_size != FEATURE_COUNT
            || weights.hidden_size != HIDDEN_SIZE
            || weights.num_layers != NUM_LAYERS
        {
            return Err(ModelLoadError::Shape(format!(
                "expected architecture {FEATURE_COUNT}x{HIDDEN_SIZE}x{NUM_LAYERS}, \
                 artifact declares {}x{}x{}",
                weights.input_size, weights.hidden_size, weights.num_layers
            )));
        }
        info!(
            path = %path.as_ref().display(),
            input_size = weights.input_size,
            hidden_size = weights.hidden_size,
            num_layers = weights.num_layers,
            "Loaded model artifact"
        );
        Ok(Self::new(MultiTaskLstm::from_weights(weights)))
    }

    /// Runs the end-to-end pipeline on a caller-supplied series: length
    /// check, constant injection, scaling, forward pass.
    pub fn predict(&self, points: &[TimePoint]) -> Result<RiskScores, PredictError> {
        let rows = assemble_sequence(points)?;
        let scaled: Vec<Vec<f32>> = rows
            .iter()
            .map(|row| self.scaler.scale(row).to_vec())
            .collect();
        let (hemorrhage, icu_admission) = self.model.forward(&scaled)?;
        Ok(RiskScores {
            hemorrhage,
            icu_admission,
        })
    }
}
