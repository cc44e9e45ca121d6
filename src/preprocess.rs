//! Turns a decoded image into the model's input tensor.
//!
//! The order of operations is fixed: channel normalization to RGB, bilinear
//! resize to 224×224, division by 255, then the leading batch axis. Changing
//! any of it changes the numbers the model sees.

use image::{imageops::FilterType, DynamicImage};
use tracing::debug;

use crate::error::{Error, Result};

pub const TENSOR_HEIGHT: usize = 224;
pub const TENSOR_WIDTH: usize = 224;
pub const TENSOR_CHANNELS: usize = 3;

/// (batch, height, width, channels)
pub const TENSOR_SHAPE: [usize; 4] = [1, TENSOR_HEIGHT, TENSOR_WIDTH, TENSOR_CHANNELS];

/// Input tensor of shape (1, 224, 224, 3), values in [0, 1], stored row-major
/// (pixel after pixel, R, G, B within each pixel).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    shape: [usize; 4],
    data: Vec<f64>,
}

impl NormalizedTensor {
    /// Wraps raw values, checking only that their count matches `shape`.
    ///
    /// The pipeline always builds tensors through `preprocess`; this exists for
    /// callers that already hold pixel data, and is how a classifier ends up
    /// being handed a tensor of the wrong shape.
    pub fn from_raw(shape: [usize; 4], data: Vec<f64>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::Inference(format!(
                "tensor data has {} values but shape {:?} needs {}",
                data.len(), shape, expected
            )));
        }
        Ok(NormalizedTensor { shape, data })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Builds the model input from any decoded image.
///
/// Alpha is dropped and grayscale is replicated across R, G and B before
/// resizing, so the channel count is always 3. Never fails.
pub fn preprocess(img: &DynamicImage) -> NormalizedTensor {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let resized = rgb
        .resize_exact(TENSOR_WIDTH as u32, TENSOR_HEIGHT as u32, FilterType::Triangle)
        .to_rgb8();

    let data: Vec<f64> = resized
        .pixels()
        .flat_map(|p| p.0.iter().map(|&c| c as f64 / 255.0))
        .collect();

    debug!(
        from_width = img.width(),
        from_height = img.height(),
        values = data.len(),
        "preprocessed image"
    );
    NormalizedTensor { shape: TENSOR_SHAPE, data }
}
