//! In-memory storage implementation
//!
//! Keyspace operations live here; the per-structure operations are spread
//! over `crate::commands`, one file per value kind.

use super::entry::Entry;
use super::expiry::ExpiryQueue;
use super::value::Value;
use crate::config::StoreConfig;
use siphasher::sip::SipHasher13;
use std::collections::hash_map::{self, HashMap};
use std::hash::BuildHasherDefault;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Type alias for our hash map with SipHasher
type StoreMap = HashMap<String, Entry, BuildHasherDefault<SipHasher13>>;

/// In-memory key-value store
///
/// Single-threaded: every operation runs to completion and drains due
/// expirations before touching the keyspace. Wrap it in a
/// [`SharedStore`](crate::SharedStore) to use it from several threads.
#[derive(Debug)]
pub struct MemoryStore {
    /// The main storage map
    pub(crate) entries: StoreMap,

    /// Pending expirations, one per ttl-bearing entry
    pub(crate) expiry: ExpiryQueue,

    /// Default ttl applied when a write omits one
    default_ttl: i64,
}

impl MemoryStore {
    /// Create a store without default expiration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store whose writes expire after `ttl` seconds unless told otherwise
    pub fn with_default_ttl(ttl: i64) -> Self {
        Self::with_config(StoreConfig::with_ttl(ttl))
    }

    pub fn with_config(config: StoreConfig) -> Self {
        MemoryStore {
            entries: HashMap::with_hasher(BuildHasherDefault::<SipHasher13>::default()),
            expiry: ExpiryQueue::new(),
            default_ttl: config.ttl,
        }
    }

    /// Default ttl in seconds
    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    /// Set a key, replacing any previous value and expiration
    ///
    /// `ttl` of `None` applies the store default.
    pub fn set(&mut self, key: &str, value: impl Into<Value>, ttl: Option<i64>) {
        self.purge_expired();
        let ttl = self.resolve_ttl(ttl);
        self.put(key, value.into(), ttl);
    }

    /// Get a value by key, returns None if not found or expired
    pub fn get(&mut self, key: &str) -> Option<&Value> {
        self.entry(key).map(|entry| &entry.value)
    }

    /// Delete keys, returns how many existed
    pub fn del<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.purge_expired();
        keys.into_iter()
            .filter(|key| self.remove(key.as_ref()).is_some())
            .count()
    }

    /// Check if a key exists (and is not expired)
    pub fn exists(&mut self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Type name of the value at `key`
    pub fn type_of(&mut self, key: &str) -> Option<&'static str> {
        self.entry(key).map(|entry| entry.value.type_name())
    }

    /// Get the number of live keys
    pub fn len(&mut self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// All live keys, sorted
    pub fn keys(&mut self) -> Vec<String> {
        self.purge_expired();
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Remove all keys and cancel every pending expiration
    pub fn flush(&mut self) {
        self.entries.clear();
        self.expiry.clear();
    }

    /// Earliest pending expiration
    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiry.next_deadline()
    }

    /// Remove every entry whose timer is due, returns the number removed
    pub fn purge_expired(&mut self) -> usize {
        if self.expiry.is_empty() {
            return 0;
        }

        let mut removed = 0;
        for (handle, key) in self.expiry.drain_due(Instant::now()) {
            let owned = self
                .entries
                .get(&key)
                .map(|entry| entry.timer == Some(handle))
                .unwrap_or(false);
            if owned {
                self.entries.remove(&key);
                removed += 1;
                debug!(key = %key, "key expired");
            }
        }
        removed
    }

    /// Get statistics about the store
    pub fn stats(&mut self) -> StoreStats {
        self.purge_expired();
        StoreStats {
            keys: self.entries.len(),
            volatile_keys: self.entries.values().filter(|e| e.timer.is_some()).count(),
            pending_timers: self.expiry.len(),
            used_memory_bytes: self
                .entries
                .iter()
                .map(|(key, entry)| key.len() + entry.memory_usage())
                .sum(),
        }
    }

    /// Apply the default ttl to an omitted one
    pub(crate) fn resolve_ttl(&self, ttl: Option<i64>) -> i64 {
        ttl.unwrap_or(self.default_ttl)
    }

    /// Live entry for `key`
    pub(crate) fn entry(&mut self, key: &str) -> Option<&Entry> {
        self.purge_expired();
        self.entries.get(key)
    }

    /// Live mutable entry for `key`
    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.purge_expired();
        self.entries.get_mut(key)
    }

    /// Insert or replace the entry at `key` and re-arm its expiration
    pub(crate) fn put(&mut self, key: &str, value: Value, ttl: i64) -> &mut Entry {
        let entry = match self.entries.entry(key.to_owned()) {
            hash_map::Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                entry.value = value;
                entry
            }
            hash_map::Entry::Vacant(vacant) => vacant.insert(Entry::new(value)),
        };
        rearm(&mut self.expiry, key, entry, ttl);
        entry
    }

    /// Value at `key` if it matches `is_kind`, otherwise a fresh one from `fresh`
    ///
    /// A missing key or a key holding another kind of value is replaced and
    /// its expiration re-armed from `ttl`.
    pub(crate) fn value_or_reset(
        &mut self,
        key: &str,
        ttl: i64,
        is_kind: impl Fn(&Value) -> bool,
        fresh: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.purge_expired();
        match self.entries.entry(key.to_owned()) {
            hash_map::Entry::Occupied(occupied) if is_kind(&occupied.get().value) => {
                &mut occupied.into_mut().value
            }
            hash_map::Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                debug!(key, found = entry.value.type_name(), "replacing value of another type");
                entry.value = fresh();
                rearm(&mut self.expiry, key, entry, ttl);
                &mut entry.value
            }
            hash_map::Entry::Vacant(vacant) => {
                let entry = vacant.insert(Entry::new(fresh()));
                rearm(&mut self.expiry, key, entry, ttl);
                &mut entry.value
            }
        }
    }

    /// Re-arm the expiration of an existing key
    pub(crate) fn rearm_key(&mut self, key: &str, ttl: i64) -> bool {
        self.purge_expired();
        match self.entries.get_mut(key) {
            Some(entry) => {
                rearm(&mut self.expiry, key, entry, ttl);
                true
            }
            None => false,
        }
    }

    /// Remove a key and cancel its timer
    pub(crate) fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        if let Some(timer) = entry.timer {
            self.expiry.cancel(timer);
        }
        Some(entry)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancel the entry's timer, store `ttl` and schedule a new one when positive
fn rearm(expiry: &mut ExpiryQueue, key: &str, entry: &mut Entry, ttl: i64) {
    if let Some(old) = entry.timer.take() {
        expiry.cancel(old);
    }
    entry.ttl = ttl;
    if ttl > 0 {
        // A deadline past the clock's range never fires
        if let Some(deadline) = Instant::now().checked_add(Duration::from_secs(ttl as u64)) {
            entry.timer = Some(expiry.schedule(key, deadline));
        }
    }
}

/// Statistics about the memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub keys: usize,
    pub volatile_keys: usize,
    pub pending_timers: usize,
    pub used_memory_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_get() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", None);

        assert_eq!(store.get("key1").and_then(Value::as_str), Some("value1"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_set_replaces_variant() {
        let mut store = MemoryStore::new();
        store.set("key1", Value::from(vec![Value::from(1)]), None);
        assert_eq!(store.type_of("key1"), Some("list"));

        store.set("key1", 42, None);
        assert_eq!(store.type_of("key1"), Some("scalar"));
        assert_eq!(store.get("key1"), Some(&Value::from(42)));
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", None);
        store.set("key2", "value2", Some(10));

        assert_eq!(store.del(["key1", "key2", "missing"]), 2);
        assert!(!store.exists("key1"));
        assert_eq!(store.get("key2"), None);
        assert_eq!(store.stats().pending_timers, 0);
        assert_eq!(store.del(Vec::<String>::new()), 0);
    }

    #[test]
    fn test_exists() {
        let mut store = MemoryStore::new();
        store.set("key1", "value1", None);

        assert!(store.exists("key1"));
        assert!(!store.exists("key2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiration() {
        let mut store = MemoryStore::new();
        store.set("a", "v1", Some(1));
        assert!(store.exists("a"));

        tokio::time::advance(Duration::from_millis(1500)).await;

        assert!(!store.exists("a"));
        assert_eq!(store.get("a"), None);
        assert_eq!(store.stats().pending_timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_cancels_old_timer() {
        let mut store = MemoryStore::new();
        store.set("a", "short", Some(1));
        store.set("a", "forever", Some(0));

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(store.get("a").and_then(Value::as_str), Some("forever"));
        assert_eq!(store.stats().pending_timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_ttl_applies() {
        let mut store = MemoryStore::with_default_ttl(2);
        store.set("a", 1, None);
        store.set("b", 1, Some(0));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(!store.exists("a"));
        assert!(store.exists("b"));
    }

    #[test]
    fn test_flush_and_len() {
        let mut store = MemoryStore::new();
        store.set("a", 1, Some(100));
        store.set("b", 2, None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);

        store.flush();
        assert!(store.is_empty());
        assert_eq!(store.next_deadline(), None);
    }

    #[test]
    fn test_stats() {
        let mut store = MemoryStore::new();
        store.set("a", "xyz", Some(100));
        store.set("b", "xy", None);

        let stats = store.stats();
        assert_eq!(stats.keys, 2);
        assert_eq!(stats.volatile_keys, 1);
        assert_eq!(stats.pending_timers, 1);
        assert!(stats.used_memory_bytes >= 2 + 3 + 2);
    }

    #[test]
    fn test_huge_ttl_is_stored_without_timer() {
        let mut store = MemoryStore::new();
        store.set("a", 1, Some(i64::MAX));
        assert!(store.exists("a"));
        assert_eq!(store.get_ttl("a"), i64::MAX);
    }
}
