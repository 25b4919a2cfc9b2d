//! FerrumStore - An embedded in-memory key-value store with per-key expiration
//!
//! Keys hold one of four kinds of value (scalar, hash, set, list) and may
//! carry a ttl. The store lives inside the host process:
//! - [`MemoryStore`] is the single-threaded core
//! - [`SharedStore`] wraps it behind one mutex for multi-threaded hosts
//! - [`Reaper`] releases expired keys in the background
//!
//! ```
//! use ferrumstore::{MemoryStore, Value};
//!
//! let mut store = MemoryStore::new();
//! store.set("greeting", "hello", None);
//! store.hset("session:1", [("user", "alice")], Some(60));
//!
//! assert_eq!(store.get("greeting"), Some(&Value::from("hello")));
//! assert_eq!(store.get_ttl("session:1"), 60);
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod shared;
pub mod store;

/// Re-export commonly used types
pub use commands::TTL_ABSENT;
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use shared::{Reaper, ReaperHandle, SharedStore};
pub use store::{MemoryStore, Number, Scalar, StoreStats, Value, ValueSet};
