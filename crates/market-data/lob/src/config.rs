//! Run configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic used by the fill-cost scan. Every strategy returns the same fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStrategy {
    /// One level at a time
    Scalar,
    /// Fixed-width chunks of levels in plain arrays
    Chunked,
    /// Fixed-width chunks in SIMD lanes (falls back to `Chunked` without the `simd` feature)
    #[default]
    Simd,
}

impl ScanStrategy {
    /// All strategies, for comparisons and benchmarks
    pub const ALL: [Self; 3] = [Self::Scalar, Self::Chunked, Self::Simd];
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Chunked => "chunked",
            Self::Simd => "simd",
        };
        f.write_str(name)
    }
}

/// Configuration for a run aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Scan strategy for the cost evaluator
    pub scan: ScanStrategy,
    /// Validate each batch before merging it
    pub validate: bool,
    /// Record merge and scan latency histograms
    pub track_latency: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scan: ScanStrategy::default(),
            validate: false,
            track_latency: false,
        }
    }
}

impl RunConfig {
    /// Validating configuration for batches from untrusted producers
    #[must_use]
    pub fn checked() -> Self {
        Self {
            validate: true,
            ..Default::default()
        }
    }

    /// Configuration that records latency histograms
    #[must_use]
    pub fn profiled() -> Self {
        Self {
            track_latency: true,
            ..Default::default()
        }
    }

    /// Replace the scan strategy
    #[must_use]
    pub fn with_scan(mut self, scan: ScanStrategy) -> Self {
        self.scan = scan;
        self
    }
}
