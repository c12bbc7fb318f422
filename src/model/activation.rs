use serde::{Deserialize, Serialize};

/// Activation applied after a layer's linear transform.
///
/// Most variants are element-wise. `Softmax` is vector-valued (it couples
/// every output to every other), so activations are applied to the whole
/// pre-activation vector at once rather than one scalar at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Activation {
    Identity,
    ReLU,
    Sigmoid,
    Tanh,
    Softmax,
    LeakyReLU { alpha: f64 },
}

impl Activation {
    /// Applies the activation to a full pre-activation vector `z`.
    pub fn apply(&self, z: Vec<f64>) -> Vec<f64> {
        match self {
            Activation::Identity => z,
            Activation::ReLU => z.into_iter().map(|x| if x > 0.0 { x } else { 0.0 }).collect(),
            Activation::Sigmoid => z.into_iter().map(|x| 1.0 / (1.0 + (-x).exp())).collect(),
            Activation::Tanh => z.into_iter().map(f64::tanh).collect(),
            Activation::Softmax => softmax(&z),
            Activation::LeakyReLU { alpha } => z
                .into_iter()
                .map(|x| if x > 0.0 { x } else { alpha * x })
                .collect(),
        }
    }
}

/// Numerically stable softmax: shifts by the maximum before exponentiating
/// so large logits cannot overflow to infinity.
///
/// For non-empty finite input the result is a probability distribution: all
/// values in [0, 1], summing to 1 (the shifted maximum contributes exp(0) = 1,
/// so the denominator is never zero).
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
