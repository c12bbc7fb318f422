//! The classifier context: one loaded model plus the pipeline
//! configuration derived from it, validated once, then shared immutably.
//!
//! A `Classifier` is constructed at startup and never mutated afterwards,
//! so request handlers can hold it behind an `Arc` and run [`classify`]
//! concurrently without any locking.
//!
//! [`classify`]: Classifier::classify

use std::path::Path;
use std::time::Instant;

use log::debug;

use crate::error::{ModelError, PipelineError};
use crate::model::{Activation, Model};
use crate::pipeline::{
    decide, decode, normalize, ColorMode, InputTensor, PipelineConfig, Prediction, ScoreKind,
};

/// An immutable, ready-to-serve image classifier.
#[derive(Debug)]
pub struct Classifier {
    model: Model,
    config: PipelineConfig,
}

impl Classifier {
    /// Pairs a model with a pipeline configuration.
    ///
    /// Runs [`Model::validate`] so hand-assembled models face the same
    /// structural checks as file-loaded ones, then rejects the pair when
    /// the label list and output layer disagree on class count, or when
    /// the configured image shape does not produce exactly the number of
    /// values the input layer consumes. Catching all of this here means
    /// `classify` can assume a coherent context.
    pub fn new(model: Model, config: PipelineConfig) -> Result<Classifier, ModelError> {
        model.validate()?;
        if config.labels.len() != model.output_width() {
            return Err(ModelError::LabelCountMismatch {
                labels: config.labels.len(),
                outputs: model.output_width(),
            });
        }
        if config.element_count() != model.input_fan_in() {
            return Err(ModelError::InputWidthMismatch {
                declared: config.element_count(),
                fan_in: model.input_fan_in(),
            });
        }
        Ok(Classifier { model, config })
    }

    /// Loads a model file and derives the pipeline configuration from its
    /// embedded metadata.
    pub fn load(path: &Path) -> Result<Classifier, ModelError> {
        let model = Model::load_json(path)?;
        let config = PipelineConfig::from_model(&model)?;
        Classifier::new(model, config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn labels(&self) -> &[String] {
        &self.config.labels
    }

    /// One-line summary of what this classifier accepts and produces,
    /// used in the status route and startup log.
    pub fn describe(&self) -> String {
        let color = match self.config.color {
            ColorMode::Grayscale => "grayscale",
            ColorMode::Rgb => "rgb",
        };
        format!(
            "{}x{} {} input, {} classes",
            self.config.target_width,
            self.config.target_height,
            color,
            self.config.labels.len()
        )
    }

    /// Runs the full pipeline on an uploaded image: decode, resize,
    /// normalize, forward pass, decide.
    pub fn classify(&self, bytes: &[u8]) -> Result<Prediction, PipelineError> {
        let started = Instant::now();

        let grid = decode(bytes, &self.config)?;
        let tensor = normalize(&grid, &self.config);
        let scores = self.invoke(&tensor)?;
        let prediction = decide(&scores, self.score_kind(), &self.config.labels);

        debug!(
            "classified {} bytes as '{}' (confidence {:.4}) in {} ms",
            bytes.len(),
            prediction.label,
            prediction.confidence,
            started.elapsed().as_millis()
        );
        Ok(prediction)
    }

    /// Feeds a tensor through the model, guarding the boundary in both
    /// directions: the shape going in and score finiteness coming out.
    fn invoke(&self, tensor: &InputTensor) -> Result<Vec<f64>, PipelineError> {
        let expected = self.config.expected_dims();
        if tensor.dims() != expected.as_slice() {
            return Err(PipelineError::ShapeMismatch {
                expected,
                got: tensor.dims().to_vec(),
            });
        }

        let scores = self.model.forward(tensor.values());
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(PipelineError::Inference(
                "model produced a non-finite score".to_string(),
            ));
        }
        Ok(scores)
    }

    /// A model that already ends in softmax hands us probabilities; anything
    /// else hands us logits that the decision stage must normalize itself.
    fn score_kind(&self) -> ScoreKind {
        match self.model.output_activation() {
            Some(Activation::Softmax) => ScoreKind::Probabilities,
            _ => ScoreKind::Logits,
        }
    }
}
