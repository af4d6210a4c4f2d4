//! Market-buy fill cost
//!
//! Walks the book from the lowest price upward, taking `min(quantity,
//! remaining)` at each level until the target is met or the book runs out.
//! A target larger than the book's depth is a partial fill and prices only
//! what is there.
//!
//! The chunked and SIMD scans group [`LANES`] levels per step. A chunk is
//! priced in bulk only when its whole quantity fits inside the remaining
//! shares; otherwise the fill ends inside that chunk and it is finished one
//! level at a time. Levels past the fill point are never priced, so every
//! strategy returns exactly what the scalar scan returns.
//!
//! Overflow: the total filled is at most `shares <= u32::MAX`, and every
//! price is at most `u32::MAX`, so any partial or total cost fits in `u64`.

use crate::config::ScanStrategy;
use crate::price_levels::LevelBook;
use common::{Px, Qty};

/// Levels processed per chunk
pub const LANES: usize = 4;

/// Result of pricing one market buy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fill {
    /// Total cost of the shares bought
    pub cost: u64,
    /// Shares actually bought
    pub filled: u64,
    /// Shares asked for
    pub requested: u64,
}

impl Fill {
    /// True when the book could not cover the request
    #[inline]
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.filled < self.requested
    }

    /// Shares that could not be bought
    #[inline]
    #[must_use]
    pub const fn unfilled(&self) -> u64 {
        self.requested - self.filled
    }

    /// Average price paid, if anything was bought
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_price(&self) -> Option<f64> {
        (self.filled > 0).then(|| self.cost as f64 / self.filled as f64)
    }
}

/// Cost to buy `shares` from `book` at the best available prices
#[inline]
#[must_use]
pub fn cost_to_fill(book: &LevelBook, shares: Qty) -> u64 {
    fill_scalar(book.prices(), book.qtys(), shares).cost
}

/// Price a market buy using the given scan strategy
#[inline]
#[must_use]
pub fn fill(book: &LevelBook, shares: Qty, strategy: ScanStrategy) -> Fill {
    let (prices, qtys) = (book.prices(), book.qtys());
    match strategy {
        ScanStrategy::Scalar => fill_scalar(prices, qtys, shares),
        ScanStrategy::Chunked => fill_chunked(prices, qtys, shares),
        #[cfg(feature = "simd")]
        ScanStrategy::Simd => fill_simd(prices, qtys, shares),
        #[cfg(not(feature = "simd"))]
        ScanStrategy::Simd => fill_chunked(prices, qtys, shares),
    }
}

/// Running state shared by all scans
#[derive(Clone, Copy)]
struct Scan {
    cost: u64,
    remaining: u64,
}

impl Scan {
    const fn start(shares: Qty) -> Self {
        Self {
            cost: 0,
            remaining: shares.as_u64(),
        }
    }

    /// Level-by-level walk from `start`, stopping once the target is met
    #[inline]
    fn finish(mut self, prices: &[Px], qtys: &[Qty], start: usize, shares: Qty) -> Fill {
        for (price, qty) in prices[start..].iter().zip(&qtys[start..]) {
            if self.remaining == 0 {
                break;
            }
            let take = qty.as_u64().min(self.remaining);
            self.cost += take * price.as_u64();
            self.remaining -= take;
        }
        Fill {
            cost: self.cost,
            filled: shares.as_u64() - self.remaining,
            requested: shares.as_u64(),
        }
    }
}

/// Reference scan, one level at a time
#[must_use]
pub fn fill_scalar(prices: &[Px], qtys: &[Qty], shares: Qty) -> Fill {
    debug_assert_eq!(prices.len(), qtys.len());
    Scan::start(shares).finish(prices, qtys, 0, shares)
}

#[inline(always)]
fn lane_qtys(qtys: &[Qty]) -> [u64; LANES] {
    std::array::from_fn(|k| qtys[k].as_u64())
}

#[inline(always)]
fn lane_prices(prices: &[Px]) -> [u64; LANES] {
    std::array::from_fn(|k| prices[k].as_u64())
}

/// Portable chunked scan
#[must_use]
pub fn fill_chunked(prices: &[Px], qtys: &[Qty], shares: Qty) -> Fill {
    debug_assert_eq!(prices.len(), qtys.len());
    let mut scan = Scan::start(shares);
    let mut idx = 0;

    while scan.remaining > 0 && idx + LANES <= prices.len() {
        let q = lane_qtys(&qtys[idx..idx + LANES]);
        let chunk_qty: u64 = q.iter().sum();
        if chunk_qty > scan.remaining {
            break;
        }
        let p = lane_prices(&prices[idx..idx + LANES]);
        let mut chunk_cost = 0u64;
        for k in 0..LANES {
            chunk_cost += p[k] * q[k];
        }
        scan.cost += chunk_cost;
        scan.remaining -= chunk_qty;
        idx += LANES;
    }

    scan.finish(prices, qtys, idx, shares)
}

/// Chunked scan with the per-level products computed in `u64x4` lanes
#[cfg(feature = "simd")]
#[must_use]
pub fn fill_simd(prices: &[Px], qtys: &[Qty], shares: Qty) -> Fill {
    use wide::u64x4;

    debug_assert_eq!(prices.len(), qtys.len());
    let mut scan = Scan::start(shares);
    let mut idx = 0;

    while scan.remaining > 0 && idx + LANES <= prices.len() {
        let q = lane_qtys(&qtys[idx..idx + LANES]);
        let chunk_qty: u64 = q.iter().sum();
        if chunk_qty > scan.remaining {
            break;
        }
        let products = u64x4::new(lane_prices(&prices[idx..idx + LANES])) * u64x4::new(q);
        scan.cost += products.to_array().iter().sum::<u64>();
        scan.remaining -= chunk_qty;
        idx += LANES;
    }

    scan.finish(prices, qtys, idx, shares)
}
