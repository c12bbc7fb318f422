//! Error types for model loading and the per-request prediction pipeline.
//!
//! The split matters for propagation policy: `ModelError` can only occur at
//! startup and aborts the process before the server binds, while
//! `PipelineError` is a per-request failure that surfaces to the client and
//! is never retried or replaced with a fallback prediction.

use thiserror::Error;

/// A failure while running one uploaded image through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The uploaded bytes are not a decodable image.
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The normalized tensor's shape does not match the model's declared
    /// input shape. Fixed preprocessing makes this unreachable in practice,
    /// but a code change that broke the pipeline must fail loudly here
    /// rather than feed the model garbage.
    #[error("input tensor shape {got:?} does not match model input shape {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// The numeric engine produced an unusable result.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A failure while loading or validating a model file at startup.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("could not read model file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model file '{path}' is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model has no layers")]
    EmptyModel,

    #[error("layer {index} is malformed: {detail}")]
    MalformedLayer { index: usize, detail: String },

    #[error("layer {index} expects {expected} inputs but the previous layer produces {got}")]
    LayerChainMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("model metadata declares no input type; cannot derive a preprocessing pipeline")]
    MissingInputKind,

    #[error("declared input produces {declared} values but the first layer accepts {fan_in}")]
    InputWidthMismatch { declared: usize, fan_in: usize },

    #[error("label list has {labels} entries but the model produces {outputs} outputs")]
    LabelCountMismatch { labels: usize, outputs: usize },
}
