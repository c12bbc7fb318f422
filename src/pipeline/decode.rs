use image::imageops::FilterType;
use image::{GrayImage, RgbImage};

use crate::error::PipelineError;
use crate::pipeline::config::{ColorMode, PipelineConfig};

/// A decoded upload: color-converted and resized to the target resolution,
/// intensities still in [0, 255]. Lives only until normalization.
#[derive(Debug, Clone)]
pub enum PixelGrid {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl PixelGrid {
    pub fn width(&self) -> u32 {
        match self {
            PixelGrid::Gray(img) => img.width(),
            PixelGrid::Rgb(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            PixelGrid::Gray(img) => img.height(),
            PixelGrid::Rgb(img) => img.height(),
        }
    }

    pub fn channel_count(&self) -> usize {
        match self {
            PixelGrid::Gray(_) => 1,
            PixelGrid::Rgb(_) => 3,
        }
    }
}

/// Decodes uploaded bytes (PNG/JPEG/BMP/GIF), resizes to exactly
/// `target_width × target_height`, and converts to the configured color
/// mode.
///
/// The resize stretches to the target box; aspect ratio is deliberately
/// not preserved, matching what the models were trained on. Interpolation
/// is fixed at Lanczos3. Conversion to RGB or grayscale drops any alpha
/// channel.
///
/// Bytes that no codec recognizes produce `PipelineError::Decode`; the
/// caller must surface that to the client rather than substitute a default
/// prediction.
pub fn decode(bytes: &[u8], config: &PipelineConfig) -> Result<PixelGrid, PipelineError> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(
        config.target_width,
        config.target_height,
        FilterType::Lanczos3,
    );

    Ok(match config.color {
        ColorMode::Grayscale => PixelGrid::Gray(resized.to_luma8()),
        ColorMode::Rgb => PixelGrid::Rgb(resized.to_rgb8()),
    })
}
