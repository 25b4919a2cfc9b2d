//! Set operations (sAdd, sIsMember, sMembers, sRem, sCard)

use crate::store::{MemoryStore, Value, ValueSet};

impl MemoryStore {
    /// Add members to the set at `key`, returns how many were new
    ///
    /// A missing key or a key of another type is replaced with an empty set
    /// armed with the store's default ttl.
    pub fn sadd<I, V>(&mut self, key: &str, members: I) -> usize
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let ttl = self.resolve_ttl(None);
        let value = self.value_or_reset(key, ttl, |v| v.as_set().is_some(), Value::empty_set);
        let Some(set) = value.as_set_mut() else {
            return 0;
        };

        let mut added = 0;
        for member in members {
            if set.insert(member.into()) {
                added += 1;
            }
        }
        added
    }

    /// Deep-equality membership test
    pub fn sismember(&mut self, key: &str, member: &Value) -> bool {
        self.set_at(key).map(|set| set.contains(member)).unwrap_or(false)
    }

    /// All members, empty if the key is not a set
    pub fn smembers(&mut self, key: &str) -> Vec<Value> {
        self.set_at(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove a member, returns true if it was present
    pub fn srem(&mut self, key: &str, member: &Value) -> bool {
        self.entry_mut(key)
            .and_then(|entry| entry.value.as_set_mut())
            .map(|set| set.remove(member))
            .unwrap_or(false)
    }

    /// Number of members
    pub fn scard(&mut self, key: &str) -> usize {
        self.set_at(key).map(ValueSet::len).unwrap_or(0)
    }

    fn set_at(&mut self, key: &str) -> Option<&ValueSet> {
        self.entry(key).and_then(|entry| entry.value.as_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sadd_dedup() {
        let mut store = MemoryStore::new();
        assert_eq!(store.sadd("s", [1, 1, 2]), 2);

        assert!(store.sismember("s", &Value::from(1)));
        assert!(!store.sismember("s", &Value::from(3)));
        assert_eq!(store.scard("s"), 2);

        assert_eq!(store.sadd("s", [2, 3]), 1);
        assert_eq!(store.smembers("s"), vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn test_sadd_replaces_wrong_type() {
        let mut store = MemoryStore::new();
        store.lpush("s", ["a"]);
        store.sadd("s", ["a"]);

        assert_eq!(store.type_of("s"), Some("set"));
        assert_eq!(store.scard("s"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sadd_uses_default_ttl() {
        let mut store = MemoryStore::with_default_ttl(3);
        store.sadd("s", ["a"]);
        assert_eq!(store.get_ttl("s"), 3);

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(!store.sismember("s", &Value::from("a")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sadd_reset_cancels_previous_timer() {
        let mut store = MemoryStore::new();
        store.set("s", "plain", Some(1));
        store.sadd("s", ["a"]);
        assert_eq!(store.get_ttl("s"), 0);

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(store.sismember("s", &Value::from("a")));
        assert_eq!(store.get_ttl("s"), 0);
        assert_eq!(store.stats().pending_timers, 0);
    }

    #[test]
    fn test_srem() {
        let mut store = MemoryStore::new();
        store.sadd("s", ["a", "b"]);

        assert!(store.srem("s", &Value::from("a")));
        assert!(!store.srem("s", &Value::from("a")));
        assert!(!store.srem("missing", &Value::from("a")));
        assert_eq!(store.smembers("s"), vec![Value::from("b")]);
    }

    #[test]
    fn test_reads_on_wrong_type() {
        let mut store = MemoryStore::new();
        store.set("k", 1, None);

        assert!(!store.sismember("k", &Value::from(1)));
        assert_eq!(store.scard("k"), 0);
        assert!(store.smembers("k").is_empty());
    }
}
