//! Seeded synthetic batch sequences
//!
//! Same seed, same batches. Prices are drawn without replacement from a fixed
//! window and sorted, so every generated batch is valid and no run can grow
//! the book past [`lob::MAX_LEVELS`].

use common::{PriceLevel, Qty, UpdateBatch};
use lob::MAX_LEVELS;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index::sample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// RNG seed
    pub seed: u64,
    /// Batches to produce
    pub batches: usize,
    /// Lowest price in the window
    pub price_floor: u32,
    /// Width of the price window, capped at [`MAX_LEVELS`]
    pub price_levels: u32,
    /// Most levels a single batch may carry
    pub max_delta_levels: usize,
    /// Probability that a level is a deletion
    pub delete_ratio: f64,
    /// Largest quantity for a non-delete level
    pub max_quantity: u32,
    /// Largest share target
    pub max_shares: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            batches: 10_000,
            price_floor: 100,
            price_levels: MAX_LEVELS as u32,
            max_delta_levels: 24,
            delete_ratio: 0.1,
            max_quantity: 1_000,
            max_shares: 20_000,
        }
    }
}

impl SynthConfig {
    /// Same parameters with a different seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Same parameters with a different batch count
    #[must_use]
    pub fn with_batches(mut self, batches: usize) -> Self {
        self.batches = batches;
        self
    }

    fn window(&self) -> usize {
        let room = u32::MAX - self.price_floor;
        self.price_levels.min(room).min(MAX_LEVELS as u32) as usize
    }
}

/// Generate a batch sequence
#[must_use]
pub fn generate(config: &SynthConfig) -> Vec<UpdateBatch> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let window = config.window();
    let max_levels = config.max_delta_levels.min(window);
    let delete_ratio = if config.delete_ratio.is_nan() {
        0.0
    } else {
        config.delete_ratio.clamp(0.0, 1.0)
    };
    let max_quantity = config.max_quantity.max(1);

    let batches: Vec<_> = (0..config.batches)
        .map(|_| {
            let count = rng.gen_range(0..=max_levels);
            let mut offsets = sample(&mut rng, window, count).into_vec();
            offsets.sort_unstable();

            let levels = offsets
                .into_iter()
                .map(|offset| {
                    let qty = if rng.gen_bool(delete_ratio) {
                        0
                    } else {
                        rng.gen_range(1..=max_quantity)
                    };
                    #[allow(clippy::cast_possible_truncation)]
                    let price = config.price_floor + offset as u32;
                    PriceLevel::new(price, qty)
                })
                .collect();

            UpdateBatch {
                levels,
                shares: Qty::new(rng.gen_range(0..=config.max_shares)),
            }
        })
        .collect();

    debug!(seed = config.seed, batches = batches.len(), window, "generated synthetic batches");
    batches
}
