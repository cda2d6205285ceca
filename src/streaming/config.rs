//! Chunk store configuration

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Default world units per chunk edge
pub const DEFAULT_CHUNK_SIZE: f32 = 32.0;

/// Default maximum number of resident chunks
pub const DEFAULT_CACHE_LIMIT: usize = 64;

/// Construction-time settings for a [`ChunkStore`](crate::streaming::ChunkStore).
///
/// Immutable once the store is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// World units per chunk edge. Must be finite and > 0.
    pub chunk_size: f32,
    /// Maximum resident chunks. Must be > 0.
    pub cache_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_limit: DEFAULT_CACHE_LIMIT,
        }
    }
}

impl StoreConfig {
    pub fn new(chunk_size: f32, cache_limit: usize) -> Self {
        Self { chunk_size, cache_limit }
    }

    /// Check the invariants the store relies on
    pub fn validate(&self) -> Result<()> {
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "chunk_size must be a positive number, got {}",
                self.chunk_size
            )));
        }
        if self.cache_limit == 0 {
            return Err(Error::InvalidConfig("cache_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Load from a JSON file (sync). Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
