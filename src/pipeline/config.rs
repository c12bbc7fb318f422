use crate::error::ModelError;
use crate::model::{ChannelLayout, InputKind, Model};

/// Fashion-MNIST class names, in model output order.
///
/// The grayscale fashion deployment ships a weights file with no embedded
/// labels; its classes are fixed here in source instead.
pub const FASHION_LABELS: [&str; 10] = [
    "T-shirt/top",
    "Trouser",
    "Pullover",
    "Dress",
    "Coat",
    "Sandal",
    "Shirt",
    "Sneaker",
    "Bag",
    "Ankle boot",
];

/// Color mode the decoder converts every upload into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Rgb,
}

/// Everything that differs between serving variants, in one place.
///
/// The grayscale 28×28 and RGB 128×128 services run the identical pipeline
/// code; only this struct changes. It is fixed at startup and read-only for
/// the process lifetime.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub target_width: u32,
    pub target_height: u32,
    pub color: ColorMode,
    /// Only meaningful for `ColorMode::Rgb`; grayscale tensors have no
    /// channel axis.
    pub layout: ChannelLayout,
    /// Pixel intensities are divided by this to land in [0, 1].
    pub divisor: f64,
    /// Ordered class labels; index i names model output i.
    pub labels: Vec<String>,
}

impl PipelineConfig {
    /// The grayscale Fashion-MNIST variant: 28×28, one channel, labels
    /// embedded in source.
    pub fn fashion() -> PipelineConfig {
        PipelineConfig {
            target_width: 28,
            target_height: 28,
            color: ColorMode::Grayscale,
            layout: ChannelLayout::ChannelFirst,
            divisor: 255.0,
            labels: FASHION_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Derives the serving configuration from a loaded model.
    ///
    /// The model must declare its input type. Labels are resolved in order:
    /// 1. `output_labels` from the model metadata (length-checked),
    /// 2. the built-in Fashion-MNIST names, when the model is shaped exactly
    ///    like the fashion service (28×28 grayscale, 10 outputs),
    /// 3. numeric index labels `"0".."N-1"`.
    pub fn from_model(model: &Model) -> Result<PipelineConfig, ModelError> {
        let kind = model.input_kind().ok_or(ModelError::MissingInputKind)?;

        let (target_width, target_height, color, layout) = match *kind {
            InputKind::ImageGrayscale { width, height } => {
                (width, height, ColorMode::Grayscale, ChannelLayout::ChannelFirst)
            }
            InputKind::ImageRgb { width, height, layout } => {
                (width, height, ColorMode::Rgb, layout)
            }
        };

        let labels = resolve_labels(model)?;

        Ok(PipelineConfig {
            target_width,
            target_height,
            color,
            layout,
            divisor: 255.0,
            labels,
        })
    }

    pub fn channel_count(&self) -> usize {
        match self.color {
            ColorMode::Grayscale => 1,
            ColorMode::Rgb => 3,
        }
    }

    /// Tensor dimensions including the leading batch dimension of 1.
    ///
    /// Grayscale is `[1, H, W]`; RGB is `[1, 3, H, W]` channel-first or
    /// `[1, H, W, 3]` channel-last.
    pub fn expected_dims(&self) -> Vec<usize> {
        let (h, w) = (self.target_height as usize, self.target_width as usize);
        match (self.color, self.layout) {
            (ColorMode::Grayscale, _) => vec![1, h, w],
            (ColorMode::Rgb, ChannelLayout::ChannelFirst) => vec![1, 3, h, w],
            (ColorMode::Rgb, ChannelLayout::ChannelLast) => vec![1, h, w, 3],
        }
    }

    /// Flattened value count (excluding the batch dimension).
    pub fn element_count(&self) -> usize {
        self.channel_count() * self.target_width as usize * self.target_height as usize
    }
}

fn resolve_labels(model: &Model) -> Result<Vec<String>, ModelError> {
    let outputs = model.output_width();

    if let Some(labels) = model.metadata.as_ref().and_then(|m| m.output_labels.as_ref()) {
        if labels.len() != outputs {
            return Err(ModelError::LabelCountMismatch {
                labels: labels.len(),
                outputs,
            });
        }
        return Ok(labels.clone());
    }

    let fashion_shaped = outputs == FASHION_LABELS.len()
        && matches!(
            model.input_kind(),
            Some(InputKind::ImageGrayscale { width: 28, height: 28 })
        );
    if fashion_shaped {
        return Ok(FASHION_LABELS.iter().map(|s| s.to_string()).collect());
    }

    Ok((0..outputs).map(|i| i.to_string()).collect())
}
