use serde::{Deserialize, Serialize};

/// A dense row-major matrix of `f64` weights.
///
/// This mirrors the layout used by model weight files: `rows`/`cols` are
/// stored alongside the data so a file can be validated before any inference
/// runs. Weight matrices are shaped `(fan_in, fan_out)`, meaning row `i`
/// holds the outgoing weights of input `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from nested rows, inferring `rows`/`cols`.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let rows = data.len();
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        Matrix { rows, cols, data }
    }

    /// True when the declared `rows`/`cols` match the actual data layout.
    ///
    /// Deserialized matrices are untrusted until this has been checked: a
    /// hand-edited weight file can declare one shape and ship another.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    /// Computes `x · M` for a row vector `x` of length `rows`.
    ///
    /// The caller guarantees `x.len() == self.rows`; model validation
    /// enforces this once at load time so the per-request path stays free
    /// of shape checks.
    pub fn row_mul(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.rows, "row vector length must equal matrix rows");

        let mut out = vec![0.0; self.cols];
        for (xi, row) in x.iter().zip(self.data.iter()) {
            for (o, w) in out.iter_mut().zip(row.iter()) {
                *o += xi * w;
            }
        }
        out
    }
}
