//! TTL operations (getTTL, setTTL, persist)

use crate::error::{StoreError, StoreResult};
use crate::store::MemoryStore;
use tokio::time::Instant;

/// Returned by [`MemoryStore::get_ttl`] for a missing key
pub const TTL_ABSENT: i64 = -1;

impl MemoryStore {
    /// Configured ttl of a key in seconds
    ///
    /// This is the ttl the key was last armed with, not the time left before
    /// it expires. `0` means the key never expires and [`TTL_ABSENT`] that the
    /// key does not exist.
    pub fn get_ttl(&mut self, key: &str) -> i64 {
        self.entry(key).map(|entry| entry.ttl).unwrap_or(TTL_ABSENT)
    }

    /// Absolute time at which `key` expires
    ///
    /// None when the key is missing or never expires.
    pub fn expires_at(&mut self, key: &str) -> Option<Instant> {
        self.entry(key).and_then(|entry| entry.expires_at())
    }

    /// Replace the ttl of an existing key and restart its countdown
    pub fn set_ttl(&mut self, key: &str, ttl: i64) -> StoreResult<()> {
        if self.rearm_key(key, ttl) {
            Ok(())
        } else {
            Err(StoreError::invalid_key(key))
        }
    }

    /// Remove the expiration of an existing key
    pub fn persist(&mut self, key: &str) -> StoreResult<()> {
        self.set_ttl(key, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_ttl_no_key() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_ttl("nonexistent"), TTL_ABSENT);
    }

    #[test]
    fn test_ttl_no_expiration() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", None);
        assert_eq!(store.get_ttl("key1"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_is_nominal_not_remaining() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", Some(100));

        tokio::time::advance(Duration::from_secs(40)).await;

        assert_eq!(store.get_ttl("key1"), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_ttl_rearms() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", Some(2));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_ok!(store.set_ttl("key1", 5));
        assert_eq!(store.get_ttl("key1"), 5);

        // The original two-second timer must not fire
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.exists("key1"));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(!store.exists("key1"));
        assert_eq!(store.get_ttl("key1"), TTL_ABSENT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_at() {
        let mut store = MemoryStore::new();
        let start = Instant::now();
        store.set("volatile", 1, Some(30));
        store.set("forever", 1, None);

        assert_eq!(store.expires_at("volatile"), Some(start + Duration::from_secs(30)));
        assert_eq!(store.expires_at("forever"), None);
        assert_eq!(store.expires_at("missing"), None);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_ok!(store.set_ttl("volatile", 5));
        assert_eq!(store.expires_at("volatile"), Some(start + Duration::from_secs(15)));

        assert_ok!(store.persist("volatile"));
        assert_eq!(store.expires_at("volatile"), None);
    }

    #[test]
    fn test_set_ttl_missing_key() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.set_ttl("nope", 10),
            Err(StoreError::InvalidKey { key: "nope".into() })
        );
        assert!(!store.exists("nope"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persist_is_idempotent() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", Some(1));

        assert_ok!(store.persist("key1"));
        assert_ok!(store.persist("key1"));
        assert_eq!(store.get_ttl("key1"), 0);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(store.exists("key1"));
    }

    #[test]
    fn test_persist_missing_key() {
        let mut store = MemoryStore::new();
        assert_err!(store.persist("nope"));
    }
}
