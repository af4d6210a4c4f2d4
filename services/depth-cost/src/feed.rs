//! JSON batch feeds
//!
//! A feed file is a JSON array of batches:
//!
//! ```json
//! [{"levels": [{"price": 10, "quantity": 4}, {"price": 12, "quantity": 6}], "shares": 5}]
//! ```
//!
//! Feeds come from outside the process, so every batch is validated on load,
//! and [`run_feed`] checks each batch against the book before merging it
//! unless the caller vouches for the producer.

use common::UpdateBatch;
use lob::{BatchError, RunAggregator, RunConfig, RunMetrics, RunResult, validate_batch};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Feed loading and saving errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// File could not be opened, read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Content is not a JSON batch array
    #[error("Malformed feed: {0}")]
    Json(#[from] serde_json::Error),

    /// A batch failed validation
    #[error("Batch {batch} rejected: {source}")]
    InvalidBatch {
        /// Zero-based position of the batch in the feed
        batch: usize,
        /// Why it was rejected
        #[source]
        source: BatchError,
    },
}

impl FeedError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Parse and validate batches from any reader
pub fn read_batches<R: Read>(reader: R) -> Result<Vec<UpdateBatch>, FeedError> {
    let batches: Vec<UpdateBatch> = serde_json::from_reader(reader)?;
    for (batch, update) in batches.iter().enumerate() {
        validate_batch(update).map_err(|source| FeedError::InvalidBatch { batch, source })?;
    }
    Ok(batches)
}

/// Serialize batches to any writer
pub fn write_batches<W: Write>(writer: W, batches: &[UpdateBatch]) -> Result<(), FeedError> {
    serde_json::to_writer(writer, batches)?;
    Ok(())
}

/// Load a feed file
pub fn load_batches(path: impl AsRef<Path>) -> Result<Vec<UpdateBatch>, FeedError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FeedError::io(path, e))?;
    let batches = read_batches(BufReader::new(file))?;
    info!(path = %path.display(), batches = batches.len(), "loaded feed");
    Ok(batches)
}

/// Write a feed file, replacing any existing one
pub fn save_batches(path: impl AsRef<Path>, batches: &[UpdateBatch]) -> Result<(), FeedError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FeedError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_batches(&mut writer, batches)?;
    writer.flush().map_err(|e| FeedError::io(path, e))?;
    debug!(path = %path.display(), batches = batches.len(), "saved feed");
    Ok(())
}

/// Load a feed and fold it into a checksum.
///
/// Unless `trusted` is set, every batch is validated against the book first,
/// so a feed that would overflow the book is reported as
/// [`FeedError::InvalidBatch`] naming the first batch that does not fit.
pub fn run_feed(
    path: impl AsRef<Path>,
    mut engine: RunConfig,
    trusted: bool,
) -> Result<(RunResult, RunMetrics), FeedError> {
    let batches = load_batches(path)?;
    engine.validate |= !trusted;

    let mut aggregator = RunAggregator::new(engine);
    if let Err(source) = aggregator.run(&batches) {
        let batch = usize::try_from(aggregator.result().batches).unwrap_or(usize::MAX);
        return Err(FeedError::InvalidBatch { batch, source });
    }
    Ok(aggregator.finish())
}
