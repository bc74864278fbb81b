pub mod dataset;
pub mod features;
pub mod knn;
pub mod preprocessing;
pub mod segmentation;

use std::path::Path;

use image::{imageops, DynamicImage};

use crate::errors::PipelineError;
use crate::models::Annotation;
use knn::KnnModel;
pub use preprocessing::ThresholdPolicy;
pub use segmentation::{segment, Blobs};

/// Tunable parameters shared by the training and inference phases.
///
/// Defaults follow the constants the classifier was tuned with: a 1000px
/// working canvas, 10x10 training resolution, ten digit classes plus the
/// rejection class, ten samples per class, three neighbors, and an inverse
/// grayscale threshold at 140 with 4px closing radii.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of digit classes; the rejection class is always added after.
    pub num_classes: u32,
    /// Training samples taken from each class directory.
    pub samples_per_class: usize,
    /// Side length images are resized to before binarization.
    pub canvas_size: u32,
    /// Side length of the flattened feature grid.
    pub train_size: u32,
    /// Neighbors consulted per classification.
    pub k: usize,
    /// How the resized canvas is reduced to a binary mask.
    pub threshold: ThresholdPolicy,
    /// Radius of the dilation that closes stroke gaps.
    pub dilate_radius: u8,
    /// Radius of the erosion that trims the dilation back.
    pub erode_radius: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_classes: 10,
            samples_per_class: 10,
            canvas_size: 1000,
            train_size: 10,
            k: 3,
            threshold: ThresholdPolicy::GrayscaleThreshold { cutoff: 140 },
            dilate_radius: 4,
            erode_radius: 4,
        }
    }
}

impl PipelineConfig {
    /// Length of every feature vector under this config.
    pub fn feature_len(&self) -> usize {
        (self.train_size * self.train_size) as usize
    }

    /// Label assigned to the rejection ("X") class.
    pub fn rejection_label(&self) -> u32 {
        self.num_classes
    }

    /// Printable name for a label: the digit, or "X" for the rejection class.
    pub fn label_name(&self, label: u32) -> String {
        if label == self.num_classes {
            "X".to_string()
        } else {
            label.to_string()
        }
    }
}

/// Two-phase classification driver.
///
/// `build` constructs the training set and fits the model; `infer` segments
/// a test image and classifies every region. Build first, infer after; a
/// model is never retrained or updated incrementally.
pub struct ClassificationPipeline {
    config: PipelineConfig,
    verbose: bool,
}

impl ClassificationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// BUILD phase: read every class directory under `root`, preprocess and
    /// flatten the sampled images, and fit a fresh model on them.
    pub fn build(&self, root: &Path) -> Result<KnnModel, PipelineError> {
        let (vectors, labels) = dataset::build_training_set(root, &self.config, self.verbose)?;

        if self.verbose {
            println!(
                "Training on {} samples across {} classes",
                vectors.len(),
                self.config.num_classes + 1
            );
        }

        let mut model = KnnModel::new();
        model.train(vectors, labels)?;
        Ok(model)
    }

    /// INFER phase: preprocess the test image with the same policy the
    /// build used, segment the mask into blobs, and classify each blob's
    /// crop. Returns one annotation per blob, in segmentation order.
    ///
    /// The segmenter consumes a clone of the mask; crops are cut from the
    /// untouched original.
    pub fn infer(
        &self,
        model: &KnnModel,
        image: &DynamicImage,
    ) -> Result<Vec<Annotation>, PipelineError> {
        let mask = preprocessing::preprocess(image, &self.config)?;

        let mut annotations = Vec::new();
        for blob in segmentation::segment(mask.clone()) {
            let crop =
                imageops::crop_imm(&mask, blob.min_x, blob.min_y, blob.width(), blob.height())
                    .to_image();
            let vector = features::extract(&crop, self.config.train_size)?;
            let result = model.classify(&vector, self.config.k)?;

            if self.verbose {
                println!(
                    "  blob at ({}, {}) {}x{} -> {} (distance {:.4})",
                    blob.min_x,
                    blob.min_y,
                    blob.width(),
                    blob.height(),
                    self.config.label_name(result.label),
                    result.nearest_distance()
                );
            }

            annotations.push(Annotation {
                bounds: blob,
                label: result.label,
                distance: result.nearest_distance(),
            });
        }

        Ok(annotations)
    }
}
