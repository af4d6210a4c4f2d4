//! Fixed-capacity level storage for the single-sided book

use crate::merge::{MergeStats, merge_into};
use common::{PriceLevel, Px, Qty};

/// Maximum number of distinct price levels (size of the discrete price domain)
pub const MAX_LEVELS: usize = 401;

/// One side of the book, ascending by price.
///
/// Structure-of-arrays design for cache efficiency:
/// - All prices in one contiguous array
/// - All quantities in another contiguous array
/// - The cost scan walks both in lockstep and can load several lanes at once
///
/// Only the first `depth` slots are meaningful. Every stored quantity is
/// nonzero and prices are strictly increasing.
#[derive(Clone, Debug)]
pub struct LevelBook {
    prices: [Px; MAX_LEVELS],
    qtys: [Qty; MAX_LEVELS],
    depth: usize,
}

impl Default for LevelBook {
    fn default() -> Self {
        Self {
            prices: [Px::ZERO; MAX_LEVELS],
            qtys: [Qty::ZERO; MAX_LEVELS],
            depth: 0,
        }
    }
}

impl PartialEq for LevelBook {
    fn eq(&self, other: &Self) -> bool {
        self.prices() == other.prices() && self.qtys() == other.qtys()
    }
}

impl Eq for LevelBook {}

impl LevelBook {
    /// Create a new empty book
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from an already sorted, zero-free level slice.
    ///
    /// # Panics
    ///
    /// Panics if `levels` holds more than [`MAX_LEVELS`] entries.
    #[must_use]
    pub fn from_levels(levels: &[PriceLevel]) -> Self {
        let mut book = Self::new();
        for level in levels {
            book.push(level.price, level.quantity);
        }
        book
    }

    /// Drop all levels
    #[inline]
    pub fn clear(&mut self) {
        self.depth = 0;
    }

    /// Append a level after the current best-to-worst tail.
    ///
    /// Caller keeps prices strictly increasing and quantities nonzero.
    #[inline]
    pub(crate) fn push(&mut self, price: Px, qty: Qty) {
        debug_assert!(
            self.depth < MAX_LEVELS,
            "book is full ({MAX_LEVELS} levels), cannot add price {price}"
        );
        debug_assert!(!qty.is_zero(), "zero quantity stored at {price}");
        debug_assert!(
            self.depth == 0 || self.prices[self.depth - 1] < price,
            "price {price} does not extend the book"
        );
        self.prices[self.depth] = price;
        self.qtys[self.depth] = qty;
        self.depth += 1;
    }

    /// Number of valid levels
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Check if the book is empty
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Valid prices, ascending
    #[inline]
    #[must_use]
    pub fn prices(&self) -> &[Px] {
        &self.prices[..self.depth]
    }

    /// Quantities aligned with [`Self::prices`]
    #[inline]
    #[must_use]
    pub fn qtys(&self) -> &[Qty] {
        &self.qtys[..self.depth]
    }

    /// Iterate levels in ascending price order
    pub fn iter(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.prices()
            .iter()
            .zip(self.qtys())
            .map(|(&price, &quantity)| PriceLevel { price, quantity })
    }

    /// Total quantity resting in the book
    #[must_use]
    pub fn total_qty(&self) -> u64 {
        self.qtys().iter().map(Qty::as_u64).sum()
    }

    /// Copy the levels out
    #[must_use]
    pub fn to_vec(&self) -> Vec<PriceLevel> {
        self.iter().collect()
    }
}

/// Two-slot arena holding the current book and the merge target.
///
/// Each merge writes into the idle slot and then flips `current`, so the
/// book being read is never the book being written.
#[derive(Clone, Debug, Default)]
pub struct BookBuffers {
    books: [LevelBook; 2],
    current: usize,
}

impl BookBuffers {
    /// Create both slots empty
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The book produced by the most recent merge
    #[inline]
    #[must_use]
    pub fn current(&self) -> &LevelBook {
        &self.books[self.current]
    }

    /// Merge `delta` into the current book and make the result current
    pub fn apply(&mut self, delta: &[PriceLevel]) -> MergeStats {
        let [first, second] = &mut self.books;
        let (src, dst) = if self.current == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };
        let stats = merge_into(src, delta, dst);
        self.current ^= 1;
        stats
    }
}
