use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, Rgb};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

use super::PipelineConfig;
use crate::errors::PipelineError;

/// How a resized color canvas is reduced to a foreground/background mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// Grayscale conversion followed by an inverse binary threshold:
    /// pixels at or below `cutoff` luminance become foreground.
    GrayscaleThreshold { cutoff: u8 },
    /// Per-channel inclusive range test: pixels with every channel inside
    /// `[low, high]` become foreground.
    ColorRangeMask { low: [u8; 3], high: [u8; 3] },
}

/// Normalize a decoded image into a binary mask.
///
/// The image is resized to `canvas_size x canvas_size` with bilinear
/// interpolation, binarized per the configured [`ThresholdPolicy`], then a
/// dilation followed by an erosion closes small gaps inside strokes and
/// trims the growth back. Foreground is 255, background 0. The same image
/// and config always produce a bit-identical mask.
pub fn preprocess(
    image: &DynamicImage,
    config: &PipelineConfig,
) -> Result<GrayImage, PipelineError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage);
    }

    let resized = image.resize_exact(config.canvas_size, config.canvas_size, FilterType::Triangle);
    let mask = binarize(&resized, &config.threshold);
    let mask = dilate(&mask, Norm::LInf, config.dilate_radius);
    Ok(erode(&mask, Norm::LInf, config.erode_radius))
}

fn binarize(image: &DynamicImage, policy: &ThresholdPolicy) -> GrayImage {
    match policy {
        ThresholdPolicy::GrayscaleThreshold { cutoff } => {
            threshold(&image.to_luma8(), *cutoff, ThresholdType::BinaryInverted)
        }
        ThresholdPolicy::ColorRangeMask { low, high } => {
            let rgb = image.to_rgb8();
            let mut mask = GrayImage::new(rgb.width(), rgb.height());
            for (x, y, pixel) in rgb.enumerate_pixels() {
                if in_range(pixel, low, high) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
            mask
        }
    }
}

fn in_range(pixel: &Rgb<u8>, low: &[u8; 3], high: &[u8; 3]) -> bool {
    pixel
        .0
        .iter()
        .zip(low.iter().zip(high))
        .all(|(&channel, (&lo, &hi))| lo <= channel && channel <= hi)
}
