//! Store errors

use thiserror::Error;

/// Result alias used by every fallible store operation
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store operations
///
/// All errors are local to the call that produced them; the store is left
/// unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The operation needs an existing key (or a numeric value) and found none
    #[error("invalid key '{key}'")]
    InvalidKey { key: String },

    /// The key exists but holds another kind of value
    #[error("key '{key}' holds a {found}, expected a {expected}")]
    InvalidKeyType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// List index beyond the last element
    #[error("index {index} out of range for list '{key}' of length {len}")]
    OutOfIndex { key: String, index: i64, len: usize },

    /// Integer increment would overflow
    ///
    /// Numbers here are checked i64 arithmetic rather than floating point, so
    /// this kind exists in addition to the three above.
    #[error("increment would overflow value at key '{key}'")]
    Overflow { key: String },
}

impl StoreError {
    pub(crate) fn invalid_key(key: &str) -> Self {
        StoreError::InvalidKey { key: key.to_owned() }
    }
}
