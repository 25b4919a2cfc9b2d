//! Bulk key operations (mGet, mSet)

use crate::store::{MemoryStore, Value};

impl MemoryStore {
    /// Look up several keys at once
    ///
    /// The result is positional: a missing key yields `None` at its index.
    pub fn mget<I, K>(&mut self, keys: I) -> Vec<Option<Value>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.purge_expired();
        keys.into_iter()
            .map(|key| self.entries.get(key.as_ref()).map(|e| e.value.clone()))
            .collect()
    }

    /// Set several keys at once
    ///
    /// Unlike [`MemoryStore::set`], the store's default ttl is ignored: every
    /// key written here never expires.
    pub fn mset<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.purge_expired();
        for (key, value) in pairs {
            self.put(key.as_ref(), value.into(), 0);
        }
    }
}
