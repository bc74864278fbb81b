//! Integration tests for the BUILD phase: directory listing, sample
//! quotas, and the skip-with-warning policy for unreadable files.

mod common;

use common::*;
use glyphsort::classification::dataset::list_image_files;
use glyphsort::{ClassificationPipeline, PipelineError};

#[test]
fn build_trains_on_every_class_directory() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;
    write_training_root(root.path(), 2, 4);

    let pipeline = ClassificationPipeline::new(test_config(2, 4));
    let model = pipeline.build(root.path())?;

    // 2 digit classes plus the rejection class, 4 samples each
    assert_eq!(model.len(), 12);
    Ok(())
}

#[test]
fn empty_class_directory_aborts_before_training() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;
    write_training_root(root.path(), 2, 4);

    // Replace class 1 with an empty directory
    std::fs::remove_dir_all(root.path().join("1"))?;
    std::fs::create_dir(root.path().join("1"))?;

    let pipeline = ClassificationPipeline::new(test_config(2, 4));
    let result = pipeline.build(root.path());

    match result {
        Err(PipelineError::InsufficientSamples { dir, found, required }) => {
            assert!(dir.ends_with("1"), "error should name the short directory");
            assert_eq!(found, 0);
            assert_eq!(required, 4);
        }
        other => panic!("expected InsufficientSamples, got {:?}", other.map(|m| m.len())),
    }
    Ok(())
}

#[test]
fn missing_class_directory_is_an_error() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;
    write_training_root(root.path(), 2, 4);
    std::fs::remove_dir_all(root.path().join("X"))?;

    let pipeline = ClassificationPipeline::new(test_config(2, 4));
    let result = pipeline.build(root.path());

    assert!(matches!(result, Err(PipelineError::ClassDir { .. })));
    Ok(())
}

#[test]
fn corrupt_files_do_not_count_toward_the_quota() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;
    write_training_root(root.path(), 2, 4);

    // Class 0 now has 3 good files and one that will not decode: the quota
    // of 4 can no longer be met, whatever order the listing produces.
    let class_dir = root.path().join("0");
    std::fs::remove_file(class_dir.join("sample_3.png"))?;
    write_corrupt_image(&class_dir, "sample_3.png");

    let pipeline = ClassificationPipeline::new(test_config(2, 4));
    let result = pipeline.build(root.path());

    match result {
        Err(PipelineError::InsufficientSamples { found, required, .. }) => {
            assert_eq!(found, 3);
            assert_eq!(required, 4);
        }
        other => panic!("expected InsufficientSamples, got {:?}", other.map(|m| m.len())),
    }
    Ok(())
}

#[test]
fn extra_corrupt_files_are_skipped_when_the_quota_still_fits() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;
    write_training_root(root.path(), 2, 4);

    // An undecodable extra file must not poison the build; the 4 good
    // samples still satisfy the quota.
    write_corrupt_image(&root.path().join("0"), "junk.png");

    let pipeline = ClassificationPipeline::new(test_config(2, 4));
    let model = pipeline.build(root.path())?;
    assert_eq!(model.len(), 12);
    Ok(())
}

#[test]
fn hidden_entries_and_subdirectories_are_not_listed() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;
    let dir = root.path().join("0");
    write_class_dir(root.path(), "0", 2, &class_glyph(0));
    write_corrupt_image(&dir, ".hidden.png");
    std::fs::create_dir(dir.join("nested"))?;

    let files = list_image_files(&dir)?;
    assert_eq!(files.len(), 2, "only the plain sample files should be listed");
    Ok(())
}

#[test]
fn quota_takes_only_the_first_n_files() -> anyhow::Result<()> {
    let root = tempfile::TempDir::new()?;

    // 6 files on disk, quota of 4 per class
    write_training_root(root.path(), 2, 6);

    let pipeline = ClassificationPipeline::new(test_config(2, 4));
    let model = pipeline.build(root.path())?;
    assert_eq!(model.len(), 12);
    Ok(())
}
