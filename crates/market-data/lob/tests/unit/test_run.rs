//! Run aggregator
//!
//! Tests cover:
//! - The documented worked examples as one continuous run
//! - Determinism across runs and across scan strategies
//! - Checked runs rejecting malformed batches without touching state

use crate::utils::{batch, levels};
use lob::{BatchError, MAX_LEVELS, RunAggregator, RunConfig, ScanStrategy, run, run_with};

fn worked_examples() -> Vec<common::UpdateBatch> {
    vec![
        batch(&[(10, 5)], 0),
        batch(&[(10, 0)], 3),
        batch(&[(10, 4), (12, 6)], 5),
        batch(&[(12, 10)], 8),
        batch(&[(5, 2), (10, 0), (12, 0)], 10),
    ]
}

#[test]
fn test_worked_examples_step_by_step() {
    let mut agg = RunAggregator::default();
    let costs: Vec<u64> = worked_examples().iter().map(|b| agg.step(b).fill.cost).collect();

    assert_eq!(costs, vec![0, 0, 52, 88, 10]);
    assert_eq!(agg.book().to_vec(), levels(&[(5, 2)]));
    assert_eq!(agg.checksum(), 52 ^ 88 ^ 10);

    let result = agg.result();
    assert_eq!(result.batches, 5);
    assert_eq!(result.partial_fills, 2);
}

#[test]
fn test_run_is_deterministic() {
    let batches = worked_examples();
    assert_eq!(run(&batches), run(&batches));
}

#[test]
fn test_strategies_agree() -> Result<(), BatchError> {
    let batches: Vec<_> = (0..64u32)
        .map(|i| {
            let pairs: Vec<_> = (0..12u32).map(|k| (k * 3 + i % 3, (i * 7 + k) % 5)).collect();
            batch(&pairs, i * 3)
        })
        .collect();

    let reference = run(&batches);
    for strategy in ScanStrategy::ALL {
        let (result, _) = run_with(RunConfig::checked().with_scan(strategy), &batches)?;
        assert_eq!(result, reference, "{strategy}");
    }
    Ok(())
}

#[test]
fn test_empty_run() {
    let result = run(&[]);
    assert_eq!(result.checksum, 0);
    assert_eq!(result.batches, 0);
}

#[test]
fn test_fresh_runs_share_no_state() {
    let first = run(&[batch(&[(10, 4)], 4)]);
    let second = run(&[batch(&[], 4)]);
    assert_eq!(first.checksum, 40);
    assert_eq!(second.checksum, 0);
}

#[test]
fn test_checked_run_rejects_capacity_overflow() {
    let full: Vec<_> = (0..MAX_LEVELS as u32).map(|p| (p, 1)).collect();
    let batches = vec![batch(&full, 1), batch(&[(MAX_LEVELS as u32, 1)], 1)];

    let mut agg = RunAggregator::new(RunConfig::checked());
    let err = agg.run(&batches);
    assert_eq!(
        err,
        Err(BatchError::CapacityExceeded {
            required: MAX_LEVELS + 1,
            capacity: MAX_LEVELS,
        })
    );
    assert_eq!(agg.result().batches, 1);
    assert_eq!(agg.book().depth(), MAX_LEVELS);
}

#[test]
fn test_metrics_snapshot_after_run() -> Result<(), BatchError> {
    let (_, metrics) = run_with(RunConfig::default(), &worked_examples())?;
    let snap = metrics.snapshot();
    assert_eq!(snap.batches, 5);
    assert_eq!(snap.levels_deleted, 3);
    assert_eq!(snap.levels_replaced, 1);
    assert_eq!(snap.levels_inserted, 4);
    assert_eq!(snap.max_depth, 2);
    assert_eq!(snap.shares_requested, 26);
    assert_eq!(snap.shares_filled, 15);
    assert_eq!(snap.partial_fills, 2);
    Ok(())
}
