//! Hash operations (hSet, hGet, hGetAll, hDel, hExists, hLen, hKeys, hValues)
//!
//! Writes coerce: a missing key or a key of another type becomes a fresh
//! hash. Reads never fail and answer as if the hash were empty.

use crate::store::{MemoryStore, Value};
use std::collections::HashMap;

impl MemoryStore {
    /// Merge `fields` into the hash at `key`
    ///
    /// Existing fields not named in `fields` are kept. When the key is
    /// missing or holds another type it is replaced with an empty hash whose
    /// expiration is armed from `ttl` (`None` = store default); an existing
    /// hash keeps its expiration.
    pub fn hset<I, F, V>(&mut self, key: &str, fields: I, ttl: Option<i64>)
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<Value>,
    {
        let ttl = self.resolve_ttl(ttl);
        let value = self.value_or_reset(key, ttl, |v| v.as_hash().is_some(), Value::empty_hash);
        if let Some(hash) = value.as_hash_mut() {
            for (field, v) in fields {
                hash.insert(field.into(), v.into());
            }
        }
    }

    /// Get the value of a hash field
    pub fn hget(&mut self, key: &str, field: &str) -> Option<&Value> {
        self.hash(key)?.get(field)
    }

    /// Snapshot of every field in the hash, None if the key is not a hash
    pub fn hgetall(&mut self, key: &str) -> Option<HashMap<String, Value>> {
        self.hash(key).cloned()
    }

    /// Delete a hash field, returns true if it existed
    pub fn hdel(&mut self, key: &str, field: &str) -> bool {
        self.entry_mut(key)
            .and_then(|entry| entry.value.as_hash_mut())
            .map(|hash| hash.remove(field).is_some())
            .unwrap_or(false)
    }

    pub fn hexists(&mut self, key: &str, field: &str) -> bool {
        self.hash(key).map(|hash| hash.contains_key(field)).unwrap_or(false)
    }

    pub fn hlen(&mut self, key: &str) -> usize {
        self.hash(key).map(HashMap::len).unwrap_or(0)
    }

    /// Field names of the hash
    pub fn hkeys(&mut self, key: &str) -> Vec<String> {
        self.hash(key)
            .map(|hash| hash.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Field values of the hash
    pub fn hvalues(&mut self, key: &str) -> Vec<Value> {
        self.hash(key)
            .map(|hash| hash.values().cloned().collect())
            .unwrap_or_default()
    }

    fn hash(&mut self, key: &str) -> Option<&HashMap<String, Value>> {
        self.entry(key).and_then(|entry| entry.value.as_hash())
    }
}
