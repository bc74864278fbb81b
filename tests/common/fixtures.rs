#![allow(dead_code)]

use std::fs;
use std::path::Path;

use glyphsort::{PipelineConfig, ThresholdPolicy};
use image::{ImageBuffer, Rgb, RgbImage};

/// Glyph images are drawn at this side length; tests keep the canvas small
/// so preprocessing stays fast.
pub const GLYPH_SIZE: u32 = 32;

/// A config scaled down for tests: 64px canvas, 8x8 features, 2px closing
/// radii. Class count and sample quota vary per test.
pub fn test_config(num_classes: u32, samples_per_class: usize) -> PipelineConfig {
    PipelineConfig {
        num_classes,
        samples_per_class,
        canvas_size: 64,
        train_size: 8,
        k: 3,
        threshold: ThresholdPolicy::GrayscaleThreshold { cutoff: 140 },
        dilate_radius: 2,
        erode_radius: 2,
    }
}

/// White canvas with one dark filled square per `(x, y, w, h)` box.
pub fn glyph_canvas(width: u32, height: u32, boxes: &[(u32, u32, u32, u32)]) -> RgbImage {
    ImageBuffer::from_fn(width, height, |px, py| {
        let inked = boxes
            .iter()
            .any(|&(x, y, w, h)| px >= x && px < x + w && py >= y && py < y + h);
        if inked {
            Rgb([20u8, 20, 20])
        } else {
            Rgb([255u8, 255, 255])
        }
    })
}

/// A distinct glyph per label: a dark 12x12 square whose corner of the
/// canvas depends on the label. Supports labels 0..=3.
pub fn class_glyph(label: u32) -> RgbImage {
    assert!(label <= 3, "fixture glyphs only cover labels 0..=3");
    let x = 2 + 16 * (label % 2);
    let y = 2 + 16 * (label / 2);
    glyph_canvas(GLYPH_SIZE, GLYPH_SIZE, &[(x, y, 12, 12)])
}

/// Writes `count` copies of `glyph` into `root/<name>`, creating the
/// directory.
pub fn write_class_dir(root: &Path, name: &str, count: usize, glyph: &RgbImage) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("Failed to create class directory");
    for i in 0..count {
        glyph
            .save(dir.join(format!("sample_{i}.png")))
            .expect("Failed to save test glyph");
    }
}

/// Populates a full training root: directories `0..num_classes` plus `X`,
/// each with `samples` copies of that label's glyph.
pub fn write_training_root(root: &Path, num_classes: u32, samples: usize) {
    for label in 0..num_classes {
        write_class_dir(root, &label.to_string(), samples, &class_glyph(label));
    }
    write_class_dir(root, "X", samples, &class_glyph(num_classes));
}

/// Writes a file that carries an image extension but does not decode.
pub fn write_corrupt_image(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"this is not a png").expect("Failed to write corrupt file");
}
