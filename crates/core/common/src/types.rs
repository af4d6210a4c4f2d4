//! Core types for price levels and book deltas

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price type (unsigned integer ticks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Px(u32);

impl Px {
    /// Create a price from ticks
    #[must_use]
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Get price as u32 ticks
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Get price widened to u64 for cost arithmetic
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0 as u64
    }

    /// Zero price
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantity type (unsigned integer units, also used for share targets)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Qty(u32);

impl Qty {
    /// Create a quantity from units
    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Get quantity as u32 units
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Get quantity widened to u64
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0 as u64
    }

    /// Check if quantity is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Zero quantity
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resting supply at one price point.
///
/// Inside a book the quantity is always nonzero. Inside an [`UpdateBatch`] a
/// zero quantity requests deletion of the level at that price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price of the level
    pub price: Px,
    /// Quantity available at the price
    pub quantity: Qty,
}

impl PriceLevel {
    /// Create a level from raw ticks and units
    #[must_use]
    pub const fn new(price: u32, quantity: u32) -> Self {
        Self {
            price: Px::new(price),
            quantity: Qty::new(quantity),
        }
    }

    /// True when this level signals a deletion
    #[inline]
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Notional value of the whole level (`price * quantity`)
    #[inline]
    #[must_use]
    pub const fn notional(&self) -> u64 {
        self.price.as_u64() * self.quantity.as_u64()
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.quantity, self.price)
    }
}

/// One processing step: a sorted delta plus the share target to price after it.
///
/// `levels` must be strictly increasing by price with unique prices. Callers
/// that cannot guarantee this should go through the checked path in `lob`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBatch {
    /// Level changes (insert, replace, or delete via zero quantity)
    pub levels: Vec<PriceLevel>,
    /// Shares to buy after applying the levels
    pub shares: Qty,
}

impl UpdateBatch {
    /// Create a batch from `(price, quantity)` pairs and a share target
    #[must_use]
    pub fn from_pairs(pairs: &[(u32, u32)], shares: u32) -> Self {
        Self {
            levels: pairs.iter().map(|&(p, q)| PriceLevel::new(p, q)).collect(),
            shares: Qty::new(shares),
        }
    }

    /// Number of deletions carried by this batch
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.levels.iter().filter(|l| l.is_delete()).count()
    }
}
