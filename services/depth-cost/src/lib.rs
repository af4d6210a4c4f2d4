//! # Depth-cost service
//!
//! Everything around the checksum engine in `lob` that a runnable tool needs:
//! - JSON batch feeds on disk
//! - Seeded synthetic batch generation
//! - Layered settings from a TOML file and `DEPTH_COST__*` environment variables

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod feed;
pub mod settings;
pub mod synth;

pub use crate::feed::{FeedError, load_batches, read_batches, run_feed, save_batches, write_batches};
pub use crate::settings::{ENV_PREFIX, ServiceSettings};
pub use crate::synth::{SynthConfig, generate};
