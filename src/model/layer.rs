use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;
use crate::model::activation::Activation;

/// One fully-connected layer: `a = activation(x · weights + biases)`.
///
/// Weights are `(fan_in, fan_out)`, biases `(1, fan_out)`. Unlike a training
/// layer there are no cached activations and no gradient state; `forward`
/// borrows immutably, which is what lets a loaded model be shared across
/// request threads without a lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activation: Activation,
}

impl DenseLayer {
    /// Number of inputs this layer consumes.
    pub fn fan_in(&self) -> usize {
        self.weights.rows
    }

    /// Number of outputs this layer produces.
    pub fn fan_out(&self) -> usize {
        self.weights.cols
    }

    /// Single forward step. `input.len()` must equal `fan_in()`; model
    /// validation establishes this before any request is served.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut z = self.weights.row_mul(input);
        for (zj, bj) in z.iter_mut().zip(self.biases.data[0].iter()) {
            *zj += bj;
        }
        self.activation.apply(z)
    }
}
