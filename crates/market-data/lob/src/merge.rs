//! Sorted delta merge
//!
//! Applies one batch of level changes onto the current book with a two-pointer
//! walk over both ascending sequences. On a price match the batch wins: a
//! nonzero quantity replaces the resting one, a zero quantity deletes the
//! level. Zero-quantity levels at prices the book does not hold are dropped.
//!
//! Inputs are trusted. Ordering is only asserted in debug builds; the checked
//! path lives in [`crate::validate`].

use crate::price_levels::LevelBook;
use crate::validate::is_strictly_ascending;
use common::PriceLevel;
use std::cmp::Ordering;

/// What a merge did to the book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Levels added at prices the book did not hold
    pub inserted: usize,
    /// Levels whose quantity was overwritten
    pub replaced: usize,
    /// Levels removed by a zero-quantity update
    pub deleted: usize,
}

impl MergeStats {
    /// Net change in book depth
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn depth_delta(&self) -> isize {
        self.inserted as isize - self.deleted as isize
    }
}

/// Shared two-pointer walk. `emit` receives every level of the merged book in
/// ascending order.
#[inline(always)]
fn walk<C, E>(current_len: usize, current_at: C, delta: &[PriceLevel], mut emit: E) -> MergeStats
where
    C: Fn(usize) -> PriceLevel,
    E: FnMut(PriceLevel),
{
    debug_assert!(is_strictly_ascending(delta), "delta levels must be strictly ascending");

    let mut stats = MergeStats::default();
    let (mut i, mut j) = (0, 0);

    while i < current_len && j < delta.len() {
        let resting = current_at(i);
        let update = delta[j];
        match resting.price.cmp(&update.price) {
            Ordering::Less => {
                emit(resting);
                i += 1;
            }
            Ordering::Greater => {
                if !update.is_delete() {
                    emit(update);
                    stats.inserted += 1;
                }
                j += 1;
            }
            Ordering::Equal => {
                if update.is_delete() {
                    stats.deleted += 1;
                } else {
                    emit(update);
                    stats.replaced += 1;
                }
                i += 1;
                j += 1;
            }
        }
    }

    for k in i..current_len {
        emit(current_at(k));
    }

    for update in &delta[j..] {
        if !update.is_delete() {
            emit(*update);
            stats.inserted += 1;
        }
    }

    stats
}

/// Merge `delta` onto `current`, writing the result into `out`.
///
/// `out` is cleared first and must be a different buffer from `current`.
///
/// # Panics
///
/// Panics if the merged book would exceed [`crate::MAX_LEVELS`]; staying within
/// capacity is the caller's responsibility.
pub fn merge_into(current: &LevelBook, delta: &[PriceLevel], out: &mut LevelBook) -> MergeStats {
    out.clear();
    let prices = current.prices();
    let qtys = current.qtys();
    walk(
        prices.len(),
        |i| PriceLevel {
            price: prices[i],
            quantity: qtys[i],
        },
        delta,
        |level| out.push(level.price, level.quantity),
    )
}

/// Allocating merge over plain level slices.
///
/// Same semantics as [`merge_into`] without the capacity bound.
#[must_use]
pub fn merge(current: &[PriceLevel], delta: &[PriceLevel]) -> Vec<PriceLevel> {
    let mut merged = Vec::with_capacity(current.len() + delta.len());
    walk(current.len(), |i| current[i], delta, |level| merged.push(level));
    merged
}

/// Depth the book would have after merging `delta`, without writing anything
#[must_use]
pub fn merged_len(current: &LevelBook, delta: &[PriceLevel]) -> usize {
    let mut len = 0;
    let prices = current.prices();
    let qtys = current.qtys();
    walk(
        prices.len(),
        |i| PriceLevel {
            price: prices[i],
            quantity: qtys[i],
        },
        delta,
        |_| len += 1,
    );
    len
}
