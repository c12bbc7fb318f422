//! Inference-only dense network loaded from a JSON weight file.
//!
//! # Weight file layout
//! ```text
//! {
//!   "layers": [
//!     {
//!       "weights":    { "rows": fan_in, "cols": fan_out, "data": [[f64; fan_out]; fan_in] },
//!       "biases":     { "rows": 1,      "cols": fan_out, "data": [[f64; fan_out]] },
//!       "activation": "Identity" | "ReLU" | "Sigmoid" | "Tanh" | "Softmax"
//!                     | { "LeakyReLU": { "alpha": f64 } }
//!     },
//!     ...
//!   ],
//!   "metadata": {                                  (optional)
//!     "description":   string,                     (optional)
//!     "input_type":    { "type": "ImageGrayscale", "width": u32, "height": u32 }
//!                    | { "type": "ImageRgb", "width": u32, "height": u32,
//!                        "layout": "channel_first" | "channel_last" },
//!     "output_labels": [string, ...]               (optional)
//!   }
//! }
//! ```
//!
//! Files are produced by a separate training tool; this crate only reads
//! them. `load_json` validates the whole structure up front so that a
//! malformed file stops the process at startup instead of corrupting a
//! request mid-flight.

pub mod activation;
pub mod layer;
pub mod metadata;

pub use activation::Activation;
pub use layer::DenseLayer;
pub use metadata::{ChannelLayout, InputKind, ModelMetadata};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A stack of dense layers plus optional serving metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub layers: Vec<DenseLayer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Model {
    /// Reads and validates a model from a JSON weight file.
    pub fn load_json(path: &Path) -> Result<Model, ModelError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: display.clone(),
            source,
        })?;
        let model: Model = serde_json::from_str(&raw).map_err(|source| ModelError::Json {
            path: display,
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Checks structural invariants that `forward` relies on: at least one
    /// layer, internally consistent matrices, bias rows of the right width,
    /// a nonzero fan-out per layer, consecutive layers whose shapes chain,
    /// and a declared input type (when present) that matches the first
    /// layer's fan-in.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::EmptyModel);
        }

        for (index, layer) in self.layers.iter().enumerate() {
            // A zero-width layer would leave the decision stage with no
            // scores to pick from.
            if layer.fan_out() == 0 {
                return Err(ModelError::MalformedLayer {
                    index,
                    detail: "layer produces no outputs".to_owned(),
                });
            }
            if !layer.weights.is_consistent() {
                return Err(ModelError::MalformedLayer {
                    index,
                    detail: format!(
                        "weight matrix declares {}x{} but data disagrees",
                        layer.weights.rows, layer.weights.cols
                    ),
                });
            }
            if !layer.biases.is_consistent() || layer.biases.rows != 1 {
                return Err(ModelError::MalformedLayer {
                    index,
                    detail: "biases must be a single consistent row".to_owned(),
                });
            }
            if layer.biases.cols != layer.weights.cols {
                return Err(ModelError::MalformedLayer {
                    index,
                    detail: format!(
                        "bias width {} does not match weight fan-out {}",
                        layer.biases.cols, layer.weights.cols
                    ),
                });
            }
        }

        for (index, pair) in self.layers.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.fan_in() != prev.fan_out() {
                return Err(ModelError::LayerChainMismatch {
                    index: index + 1,
                    expected: next.fan_in(),
                    got: prev.fan_out(),
                });
            }
        }

        if let Some(kind) = self.input_kind() {
            if kind.element_count() != self.input_fan_in() {
                return Err(ModelError::InputWidthMismatch {
                    declared: kind.element_count(),
                    fan_in: self.input_fan_in(),
                });
            }
        }

        Ok(())
    }

    /// Length of the flat input vector the first layer consumes.
    pub fn input_fan_in(&self) -> usize {
        self.layers.first().map(|l| l.fan_in()).unwrap_or(0)
    }

    /// Number of output scores (= number of classes).
    pub fn output_width(&self) -> usize {
        self.layers.last().map(|l| l.fan_out()).unwrap_or(0)
    }

    /// Activation of the final layer; tells the decision mapper whether the
    /// scores are already a probability distribution.
    pub fn output_activation(&self) -> Option<&Activation> {
        self.layers.last().map(|l| &l.activation)
    }

    /// Declared input preprocessing, if the file carries metadata.
    pub fn input_kind(&self) -> Option<&InputKind> {
        self.metadata.as_ref().and_then(|m| m.input_type.as_ref())
    }

    /// Runs the full forward pass. Pure: depends only on the immutable
    /// weights and the input, so concurrent callers need no synchronization.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        current
    }
}
