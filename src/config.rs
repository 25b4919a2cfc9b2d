//! Store configuration

use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

/// Default upper bound between two reaper passes
const DEFAULT_REAPER_INTERVAL_MS: u64 = 1000;

/// Configuration for a [`MemoryStore`](crate::MemoryStore)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Default ttl in seconds for writes that omit one; `0` disables expiration
    #[serde(alias = "TTL")]
    pub ttl: i64,

    /// Longest time the background reaper sleeps between passes
    pub reaper_interval_ms: u64,
}

impl StoreConfig {
    /// Parse a configuration from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse store configuration")
    }

    /// Configuration with the given default ttl
    pub fn with_ttl(ttl: i64) -> Self {
        StoreConfig {
            ttl,
            ..Self::default()
        }
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_millis(self.reaper_interval_ms.max(1))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            ttl: 0,
            reaper_interval_ms: DEFAULT_REAPER_INTERVAL_MS,
        }
    }
}
