pub mod classification;
pub mod errors;
pub mod models;

pub use classification::knn::{Classification, KnnModel, Neighbor};
pub use classification::{ClassificationPipeline, PipelineConfig, ThresholdPolicy};
pub use errors::PipelineError;
pub use models::{Annotation, Blob};
