use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;

use glyphsort::{ClassificationPipeline, PipelineConfig, ThresholdPolicy};

#[derive(Parser)]
#[command(name = "glyphsort")]
#[command(about = "Train a k-NN glyph classifier and label the regions of a test image")]
struct Cli {
    /// Root directory containing one subdirectory per class (0..9 and X)
    #[arg(value_name = "TRAIN_DIR")]
    train_dir: PathBuf,

    /// Test image to segment and classify; omit for a training-only run
    #[arg(value_name = "TEST_IMAGE")]
    test_image: Option<PathBuf>,

    /// Number of digit classes (the rejection class X is always added)
    #[arg(long, default_value_t = 10)]
    classes: u32,

    /// Training samples taken per class directory
    #[arg(long, default_value_t = 10)]
    samples: usize,

    /// Neighbors consulted per classification
    #[arg(short = 'k', long = "neighbors", default_value_t = 3)]
    k: usize,

    /// Luminance cutoff for the inverse binary threshold
    #[arg(long, default_value_t = 140)]
    cutoff: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit annotations as JSON records instead of a listing
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config = PipelineConfig {
        num_classes: args.classes,
        samples_per_class: args.samples,
        k: args.k,
        threshold: ThresholdPolicy::GrayscaleThreshold { cutoff: args.cutoff },
        ..PipelineConfig::default()
    };
    let pipeline = ClassificationPipeline::new(config).with_verbose(args.verbose);

    if args.verbose {
        println!("Building training set from {:?}\n", args.train_dir);
    }

    let model = pipeline.build(&args.train_dir)?;

    let Some(test_path) = args.test_image else {
        println!(
            "Trained on {} samples across {} classes; no test image given.",
            model.len(),
            args.classes + 1
        );
        return Ok(());
    };

    if args.verbose {
        println!("\nLoading test image: {:?}", test_path);
    }

    let img = ImageReader::open(&test_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    let annotations = pipeline.infer(&model, &img)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&annotations)?);
        return Ok(());
    }

    println!("\n=== Glyph Classification Results ===");
    println!("Total regions: {}", annotations.len());

    for annotation in &annotations {
        println!(
            "  {} at ({}, {}) {}x{} - distance: {:.4}",
            pipeline.config().label_name(annotation.label),
            annotation.bounds.min_x,
            annotation.bounds.min_y,
            annotation.bounds.width(),
            annotation.bounds.height(),
            annotation.distance,
        );
    }

    Ok(())
}
