use std::path::Path;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::pool::DEFAULT_POOL_CAPACITY;

/// [`MempoolConfig`] sets the tuning values for the transaction pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MempoolConfig {
    /// Maximum number of unconfirmed transactions held at once
    pub capacity: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl MempoolConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// [`from_path`] creates a [`MempoolConfig`] from a .toml file, with
    /// `MEMPOOL`-prefixed environment overrides.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path.as_ref().to_str().unwrap()))
            .add_source(
                Environment::with_prefix("MEMPOOL")
                    .keep_prefix(true)
                    .separator("__"),
            )
            .build()?;

        config.get::<Self>("mempool").map_err(anyhow::Error::msg)
    }
}
