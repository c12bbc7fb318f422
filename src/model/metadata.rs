use serde::{Deserialize, Serialize};

/// Memory order for multi-channel tensors.
///
/// `ChannelFirst` is planar (all red values, then green, then blue) and
/// matches models trained on `[1, C, H, W]` input; `ChannelLast` is
/// interleaved (`R,G,B,R,G,B,...`) for `[1, H, W, C]` models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelLayout {
    #[default]
    ChannelFirst,
    ChannelLast,
}

/// Declares the preprocessing a model's input layer was trained against.
/// Stored in the model file; the serving layer derives its whole pipeline
/// configuration from this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputKind {
    /// Single-channel image resized to width×height, normalized to [0, 1].
    ImageGrayscale { width: u32, height: u32 },
    /// Three-channel image resized to width×height, normalized to [0, 1].
    ImageRgb {
        width: u32,
        height: u32,
        #[serde(default)]
        layout: ChannelLayout,
    },
}

impl InputKind {
    /// Flattened element count of the tensor this input kind produces
    /// (excluding the batch dimension).
    pub fn element_count(&self) -> usize {
        match *self {
            InputKind::ImageGrayscale { width, height } => (width * height) as usize,
            InputKind::ImageRgb { width, height, .. } => (3 * width * height) as usize,
        }
    }
}

/// Annotations attached to a saved model.
///
/// Every field is optional so weight files written before a given field
/// existed still deserialize; absent labels fall back at startup (see
/// `PipelineConfig::from_model`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub description: Option<String>,
    pub input_type: Option<InputKind>,
    /// Ordered class labels for the output layer; index i names output i.
    pub output_labels: Option<Vec<String>>,
}
