pub mod classifier;
pub mod error;
pub mod math;
pub mod model;
pub mod pipeline;

// Convenience re-exports
pub use classifier::Classifier;
pub use error::{ModelError, PipelineError};
pub use math::Matrix;
pub use model::Model;
pub use pipeline::{PipelineConfig, Prediction, FASHION_LABELS};
