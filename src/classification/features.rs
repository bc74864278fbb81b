use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::errors::PipelineError;

/// Flatten a crop into a fixed-length feature vector.
///
/// The crop is resized to `train_size x train_size` with the same bilinear
/// policy preprocessing uses, every 8-bit value is scaled into [0, 1], and
/// the grid is flattened row-major into a vector of length `train_size²`.
/// Training and inference must share one `train_size` for the resulting
/// vectors to be comparable. Pure function of its inputs; a 1x1 crop is
/// valid input.
pub fn extract(crop: &GrayImage, train_size: u32) -> Result<Vec<f32>, PipelineError> {
    if crop.width() == 0 || crop.height() == 0 {
        return Err(PipelineError::EmptyImage);
    }

    let resized = imageops::resize(crop, train_size, train_size, FilterType::Triangle);
    Ok(resized.pixels().map(|p| p.0[0] as f32 / 255.0).collect())
}
