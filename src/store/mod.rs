//! In-memory storage module
//!
//! Provides the core data structures for storing entries in memory and
//! scheduling their expiration.

mod entry;
mod expiry;
mod memory;
mod value;

pub(crate) use entry::Entry;
pub use expiry::{ExpiryQueue, TimerHandle};
pub use memory::{MemoryStore, StoreStats};
pub use value::{Number, Scalar, Value, ValueSet};
