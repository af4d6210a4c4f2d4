//! Feed files on disk

use common::UpdateBatch;
use depth_cost::{FeedError, SynthConfig, generate, load_batches, run_feed, save_batches};
use lob::{BatchError, MAX_LEVELS, RunConfig};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_saved_feed_reloads_and_runs_identically() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("feed.json");
    let batches = generate(&SynthConfig::default().with_batches(300));

    save_batches(&path, &batches)?;
    let loaded = load_batches(&path)?;

    assert_eq!(loaded, batches);
    assert_eq!(lob::run(&loaded), lob::run(&batches));
    Ok(())
}

#[test]
fn test_worked_example_feed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("worked.json");
    fs::write(
        &path,
        r#"[
            {"levels": [{"price": 10, "quantity": 4}, {"price": 12, "quantity": 6}], "shares": 5},
            {"levels": [{"price": 12, "quantity": 10}], "shares": 8}
        ]"#,
    )?;

    let batches = load_batches(&path)?;
    assert_eq!(batches[1], UpdateBatch::from_pairs(&[(12, 10)], 8));
    assert_eq!(lob::run(&batches).checksum, 52 ^ 88);
    Ok(())
}

#[test]
fn test_missing_file_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_batches(&path).unwrap_err();

    assert!(matches!(err, FeedError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_duplicate_price_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dup.json");
    fs::write(
        &path,
        r#"[{"levels": [{"price": 3, "quantity": 1}, {"price": 3, "quantity": 2}], "shares": 1}]"#,
    )
    .unwrap();

    let err = load_batches(&path).unwrap_err();
    assert!(matches!(err, FeedError::InvalidBatch { batch: 0, .. }));
}

#[test]
fn test_negative_quantity_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("neg.json");
    fs::write(&path, r#"[{"levels": [{"price": 3, "quantity": -1}], "shares": 1}]"#).unwrap();

    assert!(matches!(load_batches(&path), Err(FeedError::Json(_))));
}

#[test]
fn test_feed_overflowing_book_is_rejected_by_default() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("overflow.json");
    let full: Vec<_> = (0..MAX_LEVELS as u32).map(|p| (p, 1)).collect();
    save_batches(
        &path,
        &[UpdateBatch::from_pairs(&full, 1), UpdateBatch::from_pairs(&[(1_000, 1)], 1)],
    )?;

    let err = run_feed(&path, RunConfig::default(), false).unwrap_err();
    match err {
        FeedError::InvalidBatch { batch, source } => {
            assert_eq!(batch, 1);
            assert_eq!(
                source,
                BatchError::CapacityExceeded {
                    required: MAX_LEVELS + 1,
                    capacity: MAX_LEVELS,
                }
            );
        }
        other => panic!("expected capacity rejection, got {other}"),
    }
    Ok(())
}

#[test]
fn test_run_feed_matches_in_memory_run() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("synth.json");
    let batches = generate(&SynthConfig::default().with_batches(200));
    save_batches(&path, &batches)?;

    let (checked, _) = run_feed(&path, RunConfig::default(), false)?;
    let (trusted, _) = run_feed(&path, RunConfig::default(), true)?;
    assert_eq!(checked, lob::run(&batches));
    assert_eq!(trusted, checked);
    Ok(())
}
