//! Sorted level book with market-buy fill pricing
//!
//! Cache-friendly design with a fixed-capacity structure-of-arrays book:
//! - [`merge`]: applies a sorted delta onto the sorted book (double-buffered)
//! - [`cost`]: prices a market buy by ascending-price greedy consumption
//! - [`run`]: folds per-batch fill costs into one XOR checksum
//!
//! The hot path trusts its input. [`validate`] is the checked layer for
//! producers that cannot guarantee sorted, unique, capacity-bounded batches.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod cost;
pub mod merge;
pub mod metrics;
pub mod price_levels;
pub mod run;
pub mod validate;

pub use config::{RunConfig, ScanStrategy};
pub use cost::{Fill, LANES, cost_to_fill, fill};
pub use merge::{MergeStats, merge, merge_into, merged_len};
pub use metrics::{LatencyStats, MetricsSnapshot, RunMetrics};
pub use price_levels::{BookBuffers, LevelBook, MAX_LEVELS};
pub use run::{RunAggregator, RunResult, StepOutcome, run, run_with};
pub use validate::{BatchError, validate_against, validate_batch, validate_levels};
