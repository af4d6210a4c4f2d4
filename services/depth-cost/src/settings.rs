//! Service settings
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults
//! 2. Optional settings file (format from its extension, usually TOML)
//! 3. `DEPTH_COST__<SECTION>__<KEY>` environment variables,
//!    e.g. `DEPTH_COST__ENGINE__SCAN=scalar`

use crate::synth::SynthConfig;
use config::{Config, ConfigError, Environment, File};
use lob::RunConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DEPTH_COST";

/// Settings for the depth-cost binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Run aggregator configuration
    pub engine: RunConfig,
    /// Synthetic generator parameters
    pub generator: SynthConfig,
    /// Log filter directive
    pub log: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            engine: RunConfig::default(),
            generator: SynthConfig::default(),
            log: "info".to_string(),
        }
    }
}

impl ServiceSettings {
    /// Load from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, Self::environment())
    }

    /// Load from an optional file plus an explicit environment source
    pub fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder.add_source(env).build()?;
        settings.try_deserialize()
    }

    /// Environment source with this service's prefix and separators
    #[must_use]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}
