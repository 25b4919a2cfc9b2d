//! Store operations, grouped by the kind of value they act on
//!
//! Each file adds an `impl MemoryStore` block, keeping the per-kind policy
//! (coerce, stay silent or fail) next to the operations that follow it.

mod counter;
mod hash;
mod key;
mod list;
mod search;
mod set;
mod ttl;

pub use ttl::TTL_ABSENT;
