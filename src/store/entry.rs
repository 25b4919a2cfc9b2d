//! Entry structure for key-value pairs

use super::expiry::TimerHandle;
use super::value::Value;
use tokio::time::Instant;

/// Represents a single entry in the store
#[derive(Debug, Clone)]
pub struct Entry {
    /// The value
    pub value: Value,

    /// Configured ttl in seconds; zero or negative means no expiration
    pub ttl: i64,

    /// Pending expiration timer, present iff `ttl > 0`
    pub(crate) timer: Option<TimerHandle>,
}

impl Entry {
    /// Create a new entry without expiration
    pub fn new(value: Value) -> Self {
        Entry {
            value,
            ttl: 0,
            timer: None,
        }
    }

    /// Absolute expiration time, if any
    pub fn expires_at(&self) -> Option<Instant> {
        self.timer.map(|t| t.deadline())
    }

    /// Calculate approximate memory usage of this entry in bytes
    pub fn memory_usage(&self) -> usize {
        let metadata_size = std::mem::size_of::<i64>() + std::mem::size_of::<Option<TimerHandle>>();
        self.value.memory_usage() + metadata_size
    }
}
