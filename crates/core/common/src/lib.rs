//! Shared types for the depth-cost workspace
//!
//! Prices and quantities are unsigned integer ticks/units. Level sequences are
//! kept sorted by ascending price with each price present at most once.

#![warn(missing_docs)]

pub mod types;

pub use types::{PriceLevel, Px, Qty, UpdateBatch};
