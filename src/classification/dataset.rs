use std::fs;
use std::path::{Path, PathBuf};

use image::ImageReader;

use super::{features, preprocessing, PipelineConfig};
use crate::errors::PipelineError;

/// List the plain files in a class directory, in whatever order the
/// underlying listing provides.
///
/// Hidden entries and subdirectories are excluded. No ordering is
/// guaranteed; callers must not rely on one.
pub fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|source| PipelineError::ClassDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::ClassDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') || path.is_dir() {
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

/// Build the labeled training set for the BUILD phase.
///
/// Reads `root/<label>` for labels `0..num_classes`, plus the rejection
/// directory `root/X` labeled `num_classes`. From each directory the first
/// `samples_per_class` files that decode and preprocess cleanly are used.
/// A file that fails is reported on stderr and skipped without counting
/// toward the quota; a directory that runs dry before the quota aborts the
/// whole build, so a partial class never reaches training.
pub fn build_training_set(
    root: &Path,
    config: &PipelineConfig,
    verbose: bool,
) -> Result<(Vec<Vec<f32>>, Vec<u32>), PipelineError> {
    let mut vectors = Vec::new();
    let mut labels = Vec::new();

    for label in 0..=config.num_classes {
        let dir = if label == config.num_classes {
            root.join("X")
        } else {
            root.join(label.to_string())
        };

        let files = list_image_files(&dir)?;
        let mut taken = 0usize;

        for path in &files {
            if taken == config.samples_per_class {
                break;
            }
            match sample_vector(path, config) {
                Ok(vector) => {
                    vectors.push(vector);
                    labels.push(label);
                    taken += 1;
                    if verbose {
                        println!("  [{}] {}", config.label_name(label), path.display());
                    }
                }
                Err(err) => {
                    eprintln!("warning: skipping {}: {}", path.display(), err);
                }
            }
        }

        if taken < config.samples_per_class {
            return Err(PipelineError::InsufficientSamples {
                dir,
                found: taken,
                required: config.samples_per_class,
            });
        }
    }

    Ok((vectors, labels))
}

/// Decode one training image and reduce it to a feature vector.
fn sample_vector(path: &Path, config: &PipelineConfig) -> Result<Vec<f32>, PipelineError> {
    let image = ImageReader::open(path)
        .map_err(|e| PipelineError::ImageLoad {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .decode()
        .map_err(|source| PipelineError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;

    let mask = preprocessing::preprocess(&image, config)?;
    features::extract(&mask, config.train_size)
}
