//! Run counters and latency tracking
//!
//! Counters are always kept. Latency histograms exist only when the run was
//! configured with `track_latency`, since timing every step costs more than
//! the merge itself on small books.

use crate::cost::Fill;
use crate::merge::MergeStats;
use hdrhistogram::Histogram;
use serde::Serialize;

/// Percentile summary of one latency histogram (nanoseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    /// Samples recorded
    pub count: u64,
    /// Fastest sample
    pub min: u64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub p50: u64,
    /// 90th percentile
    pub p90: u64,
    /// 99th percentile
    pub p99: u64,
    /// 99.9th percentile
    pub p999: u64,
    /// Slowest sample
    pub max: u64,
}

impl LatencyStats {
    fn from_histogram(hist: &Histogram<u64>) -> Option<Self> {
        if hist.is_empty() {
            return None;
        }
        Some(Self {
            count: hist.len(),
            min: hist.min(),
            mean: hist.mean(),
            p50: hist.value_at_percentile(50.0),
            p90: hist.value_at_percentile(90.0),
            p99: hist.value_at_percentile(99.0),
            p999: hist.value_at_percentile(99.9),
            max: hist.max(),
        })
    }
}

/// Point-in-time copy of a run's metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Batches folded into the checksum
    pub batches: u64,
    /// Levels added at new prices
    pub levels_inserted: u64,
    /// Levels whose quantity was overwritten
    pub levels_replaced: u64,
    /// Levels removed
    pub levels_deleted: u64,
    /// Steps where the book could not cover the share target
    pub partial_fills: u64,
    /// Shares asked for across all steps
    pub shares_requested: u64,
    /// Shares bought across all steps
    pub shares_filled: u64,
    /// Deepest book seen
    pub max_depth: usize,
    /// Merge latency, when tracked
    pub merge_latency: Option<LatencyStats>,
    /// Scan latency, when tracked
    pub scan_latency: Option<LatencyStats>,
}

/// Metrics accumulated over one run
#[derive(Debug, Clone)]
pub struct RunMetrics {
    batches: u64,
    levels_inserted: u64,
    levels_replaced: u64,
    levels_deleted: u64,
    partial_fills: u64,
    shares_requested: u64,
    shares_filled: u64,
    max_depth: usize,
    merge_latency: Option<Histogram<u64>>,
    scan_latency: Option<Histogram<u64>>,
}

impl RunMetrics {
    /// Create empty metrics, with histograms if `track_latency` is set
    #[must_use]
    pub fn new(track_latency: bool) -> Self {
        // 3 significant figures; creation only fails for out-of-range precision
        let histogram = || {
            if track_latency {
                Histogram::<u64>::new(3).ok()
            } else {
                None
            }
        };
        Self {
            batches: 0,
            levels_inserted: 0,
            levels_replaced: 0,
            levels_deleted: 0,
            partial_fills: 0,
            shares_requested: 0,
            shares_filled: 0,
            max_depth: 0,
            merge_latency: histogram(),
            scan_latency: histogram(),
        }
    }

    /// Whether latency histograms are being kept
    #[inline]
    #[must_use]
    pub const fn tracks_latency(&self) -> bool {
        self.merge_latency.is_some()
    }

    /// Fold one completed step into the counters
    #[inline]
    pub fn record_step(&mut self, merge: &MergeStats, fill: &Fill, depth: usize) {
        self.batches += 1;
        self.levels_inserted += merge.inserted as u64;
        self.levels_replaced += merge.replaced as u64;
        self.levels_deleted += merge.deleted as u64;
        self.shares_requested += fill.requested;
        self.shares_filled += fill.filled;
        if fill.is_partial() {
            self.partial_fills += 1;
        }
        self.max_depth = self.max_depth.max(depth);

        metrics::counter!("depth_cost_batches_total").increment(1);
        if fill.is_partial() {
            metrics::counter!("depth_cost_partial_fills_total").increment(1);
        }
        #[allow(clippy::cast_precision_loss)]
        let depth_gauge = depth as f64;
        metrics::gauge!("depth_cost_book_depth").set(depth_gauge);
    }

    /// Record how long a merge took
    #[inline]
    pub fn record_merge_latency(&mut self, nanos: u64) {
        if let Some(hist) = self.merge_latency.as_mut() {
            let _ = hist.record(nanos);
        }
    }

    /// Record how long a scan took
    #[inline]
    pub fn record_scan_latency(&mut self, nanos: u64) {
        if let Some(hist) = self.scan_latency.as_mut() {
            let _ = hist.record(nanos);
        }
    }

    /// Steps where the book could not cover the target
    #[must_use]
    pub const fn partial_fills(&self) -> u64 {
        self.partial_fills
    }

    /// Batches processed so far
    #[must_use]
    pub const fn batches(&self) -> u64 {
        self.batches
    }

    /// Copy everything out
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches: self.batches,
            levels_inserted: self.levels_inserted,
            levels_replaced: self.levels_replaced,
            levels_deleted: self.levels_deleted,
            partial_fills: self.partial_fills,
            shares_requested: self.shares_requested,
            shares_filled: self.shares_filled,
            max_depth: self.max_depth,
            merge_latency: self.merge_latency.as_ref().and_then(LatencyStats::from_histogram),
            scan_latency: self.scan_latency.as_ref().and_then(LatencyStats::from_histogram),
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new(false)
    }
}
