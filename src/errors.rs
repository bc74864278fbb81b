use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the classification pipeline.
///
/// Shape and model errors indicate configuration defects and are fatal to
/// the run that hits them; load errors concern a single image.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The image file is missing or could not be decoded.
    #[error("failed to load image {}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image or crop has no pixel data.
    #[error("image has no pixel data")]
    EmptyImage,

    /// A class directory could not be read.
    #[error("failed to read class directory {}", path.display())]
    ClassDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A class directory ran out of usable files before the sample quota.
    #[error("class directory {} yielded {} usable samples, {} required", dir.display(), found, required)]
    InsufficientSamples {
        dir: PathBuf,
        found: usize,
        required: usize,
    },

    /// A feature vector's length differs from the trained dimension.
    #[error("feature length {actual} does not match expected length {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Training vectors and labels do not pair up one-to-one.
    #[error("{vectors} training vectors paired with {labels} labels")]
    CountMismatch { vectors: usize, labels: usize },

    /// The requested neighbor count is zero or exceeds the fit set.
    #[error("k = {k} is out of range for a fit set of {samples} samples")]
    InvalidNeighborCount { k: usize, samples: usize },

    /// `classify` was called before `train`.
    #[error("classify called on an untrained model")]
    EmptyModel,
}
