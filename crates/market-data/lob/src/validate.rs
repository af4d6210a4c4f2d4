//! Checked layer for batches from untrusted producers
//!
//! The merge and scan assume sorted, unique, capacity-bounded input. Feeds
//! that cannot promise that run their batches through here first.

use crate::price_levels::{LevelBook, MAX_LEVELS};
use crate::merge::merged_len;
use common::{PriceLevel, Px, UpdateBatch};
use thiserror::Error;

/// Reasons a batch cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Prices are not ascending
    #[error("Levels out of order at index {index}: price {price} follows {previous}")]
    Unsorted {
        /// Position of the offending level
        index: usize,
        /// Price of the preceding level
        previous: Px,
        /// Price of the offending level
        price: Px,
    },

    /// Same price listed twice
    #[error("Duplicate price {price} at index {index}")]
    DuplicatePrice {
        /// Position of the second occurrence
        index: usize,
        /// Repeated price
        price: Px,
    },

    /// Batch is longer than the price domain
    #[error("Batch carries {len} levels, capacity is {capacity}")]
    TooManyLevels {
        /// Levels in the batch
        len: usize,
        /// Book capacity
        capacity: usize,
    },

    /// Merging would overflow the book
    #[error("Merged book needs {required} levels, capacity is {capacity}")]
    CapacityExceeded {
        /// Depth after the merge
        required: usize,
        /// Book capacity
        capacity: usize,
    },
}

/// True when every price is strictly greater than the one before it
#[inline]
#[must_use]
pub fn is_strictly_ascending(levels: &[PriceLevel]) -> bool {
    levels.windows(2).all(|w| w[0].price < w[1].price)
}

/// Check ordering and uniqueness of a level sequence
pub fn validate_levels(levels: &[PriceLevel]) -> Result<(), BatchError> {
    if levels.len() > MAX_LEVELS {
        return Err(BatchError::TooManyLevels {
            len: levels.len(),
            capacity: MAX_LEVELS,
        });
    }

    for (offset, pair) in levels.windows(2).enumerate() {
        let (previous, price) = (pair[0].price, pair[1].price);
        let index = offset + 1;
        if price == previous {
            return Err(BatchError::DuplicatePrice { index, price });
        }
        if price < previous {
            return Err(BatchError::Unsorted {
                index,
                previous,
                price,
            });
        }
    }

    Ok(())
}

/// Check a batch on its own, independent of any book
pub fn validate_batch(batch: &UpdateBatch) -> Result<(), BatchError> {
    validate_levels(&batch.levels)
}

/// Check a batch against the book it is about to be merged into
pub fn validate_against(book: &LevelBook, batch: &UpdateBatch) -> Result<(), BatchError> {
    validate_batch(batch)?;
    let required = merged_len(book, &batch.levels);
    if required > MAX_LEVELS {
        return Err(BatchError::CapacityExceeded {
            required,
            capacity: MAX_LEVELS,
        });
    }
    Ok(())
}
