//! The request-to-prediction pipeline.
//!
//! Four stages, each a pure function over the previous one's output:
//! decode bytes into a [`PixelGrid`], normalize the grid into an
//! [`InputTensor`], run the model, then [`decide`] on a winning class.
//! The [`PipelineConfig`] that drives the first two stages is derived
//! once from the model's metadata at load time.

pub mod config;
pub mod decision;
pub mod decode;
pub mod tensor;

pub use config::{ColorMode, PipelineConfig, FASHION_LABELS};
pub use decision::{argmax, decide, Prediction, ScoreKind};
pub use decode::{decode, PixelGrid};
pub use tensor::{normalize, InputTensor};
