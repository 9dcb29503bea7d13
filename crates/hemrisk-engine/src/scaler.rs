//! Min-max feature scaling over fixed clinical bounds.

use hemrisk_core::{FEATURE_COUNT, FEATURE_HI, FEATURE_LO};

/// Per-feature affine rescale into [0,1].
///
/// Unclamped: a value outside the fitted bounds extrapolates outside
/// [0,1] and is passed to the encoder as-is. The scaler has no error
/// path.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    lo: [f32; FEATURE_COUNT],
    hi: [f32; FEATURE_COUNT],
}

impl MinMaxScaler {
    /// Bounds must be pairwise distinct; the clinical bounds are.
    pub fn new(lo: [f32; FEATURE_COUNT], hi: [f32; FEATURE_COUNT]) -> Self {
        Self { lo, hi }
    }

    /// Scaler over the bounds the model was trained with.
    pub fn clinical() -> Self {
        Self::new(FEATURE_LO, FEATURE_HI)
    }

    pub fn scale(&self, raw: &[f32; FEATURE_COUNT]) -> [f32; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (raw[i] - self.lo[i]) / (self.hi[i] - self.lo[i]);
        }
        out
    }
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::clinical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(got: f32, want: f32) {
        assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
    }

    #[test]
    fn test_hemoglobin_bounds_are_linear() {
        let scaler = MinMaxScaler::clinical();
        assert_close(scaler.scale(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])[0], 0.0);
        assert_close(scaler.scale(&[20.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])[0], 1.0);
        assert_close(scaler.scale(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])[0], 0.5);
    }

    #[test]
    fn test_full_row() {
        let scaler = MinMaxScaler::clinical();
        let row = scaler.scale(&[10.0, 30.0, 200.0, 12.0, 1.0, 30.0, 300.0]);
        let want = [0.5, 0.5, 0.2, 0.12, 0.1, 0.15, 0.3];
        for i in 0..FEATURE_COUNT {
            assert_close(row[i], want[i]);
        }
    }

    #[test]
    fn test_out_of_range_extrapolates_without_clamping() {
        let scaler = MinMaxScaler::clinical();
        assert_close(scaler.scale(&[25.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])[0], 1.25);
        assert_close(scaler.scale(&[-2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])[0], -0.1);
    }
}
