//! Stacked LSTM encoder with two independent scoring heads.
//!
//! Hand-rolled dense linear algebra over flat row-major buffers. The
//! forward pass is inference-only: the inter-layer dropout used during
//! training does not exist here, so identical input and identical weights
//! give bit-for-bit identical output.

use hemrisk_core::PredictError;

use crate::weights::{HeadWeights, LayerWeights, ModelWeights};

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// One stacked layer. Gate rows of `w_ih`/`w_hh` are laid out gate-major
/// in the order input, forget, cell, output, matching the trained artifact.
#[derive(Debug)]
struct LstmLayer {
    w_ih: Vec<f32>, // (4 * hidden) x input, row-major
    w_hh: Vec<f32>, // (4 * hidden) x hidden, row-major
    b_ih: Vec<f32>, // 4 * hidden
    b_hh: Vec<f32>, // 4 * hidden
    input_size: usize,
    hidden_size: usize,
}

impl LstmLayer {
    fn from_weights(w: LayerWeights, input_size: usize, hidden_size: usize) -> Self {
        Self {
            w_ih: w.w_ih,
            w_hh: w.w_hh,
            b_ih: w.b_ih,
            b_hh: w.b_hh,
            input_size,
            hidden_size,
        }
    }

    /// Advances this layer by one time step, updating `h` and `c` in place.
    /// `gates` is caller-provided scratch of length `4 * hidden`.
    fn step(&self, x: &[f32], h: &mut [f32], c: &mut [f32], gates: &mut [f32]) {
        let hs = self.hidden_size;
        for r in 0..4 * hs {
            let mut acc = self.b_ih[r] + self.b_hh[r];
            let w_row = &self.w_ih[r * self.input_size..(r + 1) * self.input_size];
            for (w, xv) in w_row.iter().zip(x) {
                acc += w * xv;
            }
            let u_row = &self.w_hh[r * hs..(r + 1) * hs];
            for (u, hv) in u_row.iter().zip(h.iter()) {
                acc += u * hv;
            }
            gates[r] = acc;
        }
        for j in 0..hs {
            let i = sigmoid(gates[j]);
            let f = sigmoid(gates[hs + j]);
            let g = gates[2 * hs + j].tanh();
            let o = sigmoid(gates[3 * hs + j]);
            c[j] = f * c[j] + i * g;
            h[j] = o * c[j].tanh();
        }
    }
}

/// Linear projection plus logistic squash: one task's scoring head.
#[derive(Debug)]
struct ScoringHead {
    weight: Vec<f32>, // hidden
    bias: f32,
}

impl ScoringHead {
    fn from_weights(w: HeadWeights) -> Self {
        Self {
            weight: w.weight,
            bias: w.bias,
        }
    }

    fn project(&self, shared: &[f32]) -> f32 {
        let z: f32 = self
            .weight
            .iter()
            .zip(shared)
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        sigmoid(z)
    }
}

/// The multi-task sequence model: a stacked recurrence feeding two
/// independent heads. Weights are immutable after construction; every
/// forward call owns its hidden/cell state, so a single instance is safe
/// to share across concurrent calls.
#[derive(Debug)]
pub struct MultiTaskLstm {
    layers: Vec<LstmLayer>,
    hemorrhage_head: ScoringHead,
    icu_head: ScoringHead,
    input_size: usize,
    hidden_size: usize,
}

impl MultiTaskLstm {
    /// Builds the network from a validated artifact. Layer 0 reads the
    /// feature row; every upper layer reads the hidden width below it.
    pub fn from_weights(weights: ModelWeights) -> Self {
        let input_size = weights.input_size;
        let hidden_size = weights.hidden_size;
        let layers = weights
            .layers
            .into_iter()
            .enumerate()
            .map(|(l, w)| {
                let layer_input = if l == 0 { input_size } else { hidden_size };
                LstmLayer::from_weights(w, layer_input, hidden_size)
            })
            .collect();
        Self {
            layers,
            hemorrhage_head: ScoringHead::from_weights(weights.hemorrhage_head),
            icu_head: ScoringHead::from_weights(weights.icu_head),
            input_size,
            hidden_size,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Runs the normalized sequence through the stacked recurrence and both
    /// heads, returning `(hemorrhage, icu)` probabilities in (0,1).
    ///
    /// Hidden and cell state start at zero on every call; nothing carries
    /// over between calls. A step whose width does not match the encoder's
    /// input width fails instead of being truncated or padded.
    pub fn forward(&self, sequence: &[Vec<f32>]) -> Result<(f32, f32), PredictError> {
        for step in sequence {
            if step.len() != self.input_size {
                return Err(PredictError::ShapeMismatch {
                    expected: self.input_size,
                    got: step.len(),
                });
            }
        }

        let hs = self.hidden_size;
        let depth = self.layers.len();
        let mut h = vec![vec![0.0f32; hs]; depth];
        let mut c = vec![vec![0.0f32; hs]; depth];
        let mut gates = vec![0.0f32; 4 * hs];
        let mut xbuf: Vec<f32> = Vec::with_capacity(self.input_size.max(hs));

        for step in sequence {
            xbuf.clear();
            xbuf.extend_from_slice(step);
            for (l, layer) in self.layers.iter().enumerate() {
                layer.step(&xbuf, &mut h[l], &mut c[l], &mut gates);
                xbuf.clear();
                xbuf.extend_from_slice(&h[l]);
            }
        }

        // Only the final step's top-layer hidden state feeds the heads.
        let shared = &h[depth - 1];
        Ok((
            self.hemorrhage_head.project(shared),
            self.icu_head.project(shared),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-cell network (input 1, hidden 1, one layer) with every weight
    /// one and every bias zero.
    fn unit_cell() -> MultiTaskLstm {
        let layer = LayerWeights {
            w_ih: vec![1.0; 4],
            w_hh: vec![1.0; 4],
            b_ih: vec![0.0; 4],
            b_hh: vec![0.0; 4],
        };
        MultiTaskLstm::from_weights(ModelWeights {
            input_size: 1,
            hidden_size: 1,
            num_layers: 1,
            layers: vec![layer],
            hemorrhage_head: HeadWeights {
                weight: vec![1.0],
                bias: 0.0,
            },
            icu_head: HeadWeights {
                weight: vec![1.0],
                bias: 0.0,
            },
        })
    }

    #[test]
    fn test_saturated_cell_matches_hand_computation() {
        // x = 100 saturates all four gates: i, f, o -> 1 and g -> 1, so
        // after one step c = 1 and h = tanh(1). Both heads see sigmoid(h).
        let model = unit_cell();
        let (hem, icu) = model.forward(&[vec![100.0]]).unwrap();
        let want = sigmoid(1.0f32.tanh());
        assert!((hem - want).abs() < 1e-3, "got {hem}, want {want}");
        assert_eq!(hem, icu);
    }

    #[test]
    fn test_zero_weights_give_even_odds() {
        let layer = LayerWeights {
            w_ih: vec![0.0; 4 * 2 * 2],
            w_hh: vec![0.0; 4 * 2 * 2],
            b_ih: vec![0.0; 4 * 2],
            b_hh: vec![0.0; 4 * 2],
        };
        let model = MultiTaskLstm::from_weights(ModelWeights {
            input_size: 2,
            hidden_size: 2,
            num_layers: 1,
            layers: vec![layer],
            hemorrhage_head: HeadWeights {
                weight: vec![0.0; 2],
                bias: 0.0,
            },
            icu_head: HeadWeights {
                weight: vec![0.0; 2],
                bias: 0.0,
            },
        });
        // All-zero weights leave the shared representation at zero, so both
        // heads emit exactly sigmoid(0).
        let (hem, icu) = model.forward(&[vec![3.0, -1.0], vec![0.5, 0.5]]).unwrap();
        assert_eq!(hem, 0.5);
        assert_eq!(icu, 0.5);
    }

    #[test]
    fn test_step_order_matters() {
        let model = unit_cell();
        let ab = model.forward(&[vec![0.9], vec![0.1]]).unwrap();
        let ba = model.forward(&[vec![0.1], vec![0.9]]).unwrap();
        assert_ne!(ab.0, ba.0);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let model = unit_cell();
        let err = model.forward(&[vec![0.5, 0.5]]).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ShapeMismatch {
                expected: 1,
                got: 2
            }
        ));
    }

    #[test]
    fn test_forward_is_bit_for_bit_deterministic() {
        let model = unit_cell();
        let input = vec![vec![0.25], vec![0.5], vec![0.75]];
        let (a0, a1) = model.forward(&input).unwrap();
        let (b0, b1) = model.forward(&input).unwrap();
        assert_eq!(a0.to_bits(), b0.to_bits());
        assert_eq!(a1.to_bits(), b1.to_bits());
    }

    #[test]
    fn test_outputs_stay_in_open_unit_interval() {
        let model = unit_cell();
        for x in [-1000.0, -1.0, 0.0, 1.0, 1000.0] {
            let (hem, icu) = model.forward(&[vec![x], vec![x], vec![x]]).unwrap();
            assert!(hem > 0.0 && hem < 1.0);
            assert!(icu > 0.0 && icu < 1.0);
        }
    }
}
