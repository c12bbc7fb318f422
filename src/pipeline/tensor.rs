use crate::model::ChannelLayout;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::decode::PixelGrid;

/// A normalized, fixed-shape input batch of size 1.
///
/// `dims` always carries the leading batch dimension: `[1, H, W]` for
/// grayscale, `[1, 3, H, W]` or `[1, H, W, 3]` for RGB depending on layout.
/// Values are in [0, 1]. Consumed exactly once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    dims: Vec<usize>,
    data: Vec<f64>,
}

impl InputTensor {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Rescales a pixel grid into the [0, 1] tensor the model input layer
/// expects, adding the batch dimension.
///
/// Every channel value is divided by `config.divisor` (255 for 8-bit
/// input); an all-black grid therefore yields an all-zero tensor, and the
/// divisor is a constant so no division-by-zero case exists. The dims are
/// derived from the grid itself, not from the config, so a decoding bug
/// that produced the wrong resolution is caught by the shape check at
/// inference time instead of silently feeding the model a misshapen vector.
pub fn normalize(grid: &PixelGrid, config: &PipelineConfig) -> InputTensor {
    let (h, w) = (grid.height() as usize, grid.width() as usize);

    match grid {
        PixelGrid::Gray(img) => InputTensor {
            dims: vec![1, h, w],
            data: img.pixels().map(|p| p.0[0] as f64 / config.divisor).collect(),
        },
        PixelGrid::Rgb(img) => match config.layout {
            ChannelLayout::ChannelLast => InputTensor {
                dims: vec![1, h, w, 3],
                data: img
                    .pixels()
                    .flat_map(|p| p.0.iter().map(|&c| c as f64 / config.divisor))
                    .collect(),
            },
            ChannelLayout::ChannelFirst => {
                let mut data = Vec::with_capacity(3 * h * w);
                for channel in 0..3 {
                    data.extend(img.pixels().map(|p| p.0[channel] as f64 / config.divisor));
                }
                InputTensor { dims: vec![1, 3, h, w], data }
            }
        },
    }
}
