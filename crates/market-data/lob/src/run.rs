//! Run aggregator
//!
//! Left fold over update batches: merge the batch into the book, price the
//! batch's share target against the merged book, XOR the cost into the
//! running checksum. Batches are applied strictly in order since each merge
//! reads the book the previous one produced.

use crate::config::RunConfig;
use crate::cost::{Fill, fill};
use crate::merge::MergeStats;
use crate::metrics::RunMetrics;
use crate::price_levels::{BookBuffers, LevelBook};
use crate::validate::{BatchError, validate_against};
use common::UpdateBatch;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Outcome of a complete run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RunResult {
    /// XOR of every step's fill cost
    pub checksum: u64,
    /// Batches folded in
    pub batches: u64,
    /// Steps that could not be fully filled
    pub partial_fills: u64,
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.checksum)
    }
}

/// What one step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Fill folded into the checksum; `fill.cost` is the XOR operand
    pub fill: Fill,
    /// Merge counters
    pub merge: MergeStats,
    /// Book depth after the merge
    pub depth: usize,
}

/// Owns the book for the length of a run
#[derive(Debug, Clone)]
pub struct RunAggregator {
    config: RunConfig,
    books: BookBuffers,
    checksum: u64,
    metrics: RunMetrics,
}

impl Default for RunAggregator {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl RunAggregator {
    /// Start a run with an empty book
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let metrics = RunMetrics::new(config.track_latency);
        Self {
            config,
            books: BookBuffers::new(),
            checksum: 0,
            metrics,
        }
    }

    /// Book after the latest step
    #[inline]
    #[must_use]
    pub fn book(&self) -> &LevelBook {
        self.books.current()
    }

    /// Checksum so far
    #[inline]
    #[must_use]
    pub const fn checksum(&self) -> u64 {
        self.checksum
    }

    /// Metrics so far
    #[must_use]
    pub const fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Apply one trusted batch.
    ///
    /// The batch must be sorted, unique, and keep the book within
    /// [`crate::MAX_LEVELS`]; debug builds assert the ordering.
    pub fn step(&mut self, batch: &UpdateBatch) -> StepOutcome {
        let (merge, fill) = if self.metrics.tracks_latency() {
            let started = Instant::now();
            let merge = self.books.apply(&batch.levels);
            let merged = Instant::now();
            let fill = fill(self.books.current(), batch.shares, self.config.scan);
            self.metrics.record_merge_latency(elapsed_nanos(started, merged));
            self.metrics.record_scan_latency(elapsed_nanos(merged, Instant::now()));
            (merge, fill)
        } else {
            let merge = self.books.apply(&batch.levels);
            (merge, fill(self.books.current(), batch.shares, self.config.scan))
        };

        self.checksum ^= fill.cost;
        let depth = self.books.current().depth();
        self.metrics.record_step(&merge, &fill, depth);

        trace!(
            step = self.metrics.batches(),
            levels = batch.levels.len(),
            deletes = batch.delete_count(),
            shares = %batch.shares,
            cost = fill.cost,
            avg_price = ?fill.average_price(),
            depth,
            depth_delta = merge.depth_delta(),
            "step applied"
        );
        if fill.is_partial() {
            debug!(
                step = self.metrics.batches(),
                unfilled = fill.unfilled(),
                depth,
                "book could not cover share target"
            );
        }

        StepOutcome {
            fill,
            merge,
            depth,
        }
    }

    /// Validate a batch against the current book, then apply it.
    ///
    /// A rejected batch leaves the book and checksum untouched.
    pub fn try_step(&mut self, batch: &UpdateBatch) -> Result<StepOutcome, BatchError> {
        if let Err(error) = validate_against(self.books.current(), batch) {
            warn!(step = self.metrics.batches() + 1, %error, "rejecting batch");
            return Err(error);
        }
        Ok(self.step(batch))
    }

    /// Apply batches in order, validating each one if the config asks for it
    pub fn run(&mut self, batches: &[UpdateBatch]) -> Result<RunResult, BatchError> {
        debug!(
            batches = batches.len(),
            scan = %self.config.scan,
            validate = self.config.validate,
            "starting run"
        );

        for batch in batches {
            if self.config.validate {
                self.try_step(batch)?;
            } else {
                self.step(batch);
            }
        }

        let result = self.result();
        debug!(
            checksum = result.checksum,
            partial_fills = result.partial_fills,
            "run complete"
        );
        Ok(result)
    }

    /// Result so far
    #[must_use]
    pub const fn result(&self) -> RunResult {
        RunResult {
            checksum: self.checksum,
            batches: self.metrics.batches(),
            partial_fills: self.metrics.partial_fills(),
        }
    }

    /// End the run, returning the result and the metrics
    #[must_use]
    pub fn finish(self) -> (RunResult, RunMetrics) {
        (self.result(), self.metrics)
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn elapsed_nanos(from: Instant, to: Instant) -> u64 {
    to.duration_since(from).as_nanos() as u64
}

/// Fold trusted batches into a checksum with the default configuration
#[must_use]
pub fn run(batches: &[UpdateBatch]) -> RunResult {
    let mut aggregator = RunAggregator::default();
    for batch in batches {
        aggregator.step(batch);
    }
    aggregator.result()
}

/// Fold batches with an explicit configuration, returning metrics too
pub fn run_with(config: RunConfig, batches: &[UpdateBatch]) -> Result<(RunResult, RunMetrics), BatchError> {
    let mut aggregator = RunAggregator::new(config);
    aggregator.run(batches)?;
    Ok(aggregator.finish())
}
