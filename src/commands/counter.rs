//! Counter operations (incrementBy, decrementBy)

use crate::error::{StoreError, StoreResult};
use crate::store::{MemoryStore, Number, Scalar, Value};

impl MemoryStore {
    /// Add `delta` to the numeric value at `key`, returns the new value
    ///
    /// Fails with `InvalidKey` unless the key holds a number. Integer
    /// overflow fails with `Overflow` and leaves the value untouched. The
    /// ttl of the key is not changed.
    pub fn increment_by(&mut self, key: &str, delta: impl Into<Number>) -> StoreResult<Number> {
        let delta = delta.into();
        let entry = self
            .entry_mut(key)
            .ok_or_else(|| StoreError::invalid_key(key))?;

        match &mut entry.value {
            Value::Scalar(Scalar::Number(current)) => {
                let next = current.checked_add(delta).ok_or_else(|| StoreError::Overflow {
                    key: key.to_owned(),
                })?;
                *current = next;
                Ok(next)
            }
            _ => Err(StoreError::invalid_key(key)),
        }
    }

    /// Subtract `delta` from the numeric value at `key`
    pub fn decrement_by(&mut self, key: &str, delta: impl Into<Number>) -> StoreResult<Number> {
        let delta = delta
            .into()
            .checked_neg()
            .ok_or_else(|| StoreError::Overflow { key: key.to_owned() })?;
        self.increment_by(key, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    #[test]
    fn test_increment_integer() {
        let mut store = MemoryStore::new();
        store.set("counter", 10, None);

        assert_eq!(store.increment_by("counter", 5), Ok(Number::Int(15)));
        assert_eq!(store.decrement_by("counter", 20), Ok(Number::Int(-5)));
        assert_eq!(store.get("counter"), Some(&Value::from(-5)));
    }

    #[test]
    fn test_increment_float() {
        let mut store = MemoryStore::new();
        store.set("ratio", 1.5, None);
        assert_eq!(store.increment_by("ratio", 1), Ok(Number::Float(2.5)));

        store.set("count", 1, None);
        assert_eq!(store.increment_by("count", 0.25), Ok(Number::Float(1.25)));
    }

    #[test]
    fn test_increment_missing_key() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.increment_by("nope", 1),
            Err(StoreError::InvalidKey { key: "nope".into() })
        );
        assert!(!store.exists("nope"));
    }

    #[test]
    fn test_increment_non_numeric() {
        let mut store = MemoryStore::new();
        store.set("text", "10", None);
        store.set("list", Value::from(vec![Value::from(1)]), None);

        assert_err!(store.increment_by("text", 1));
        assert_err!(store.increment_by("list", 1));
        assert_eq!(store.get("text"), Some(&Value::from("10")));
    }

    #[test]
    fn test_increment_overflow() {
        let mut store = MemoryStore::new();
        store.set("big", i64::MAX, None);

        assert_eq!(
            store.increment_by("big", 1),
            Err(StoreError::Overflow { key: "big".into() })
        );
        assert_eq!(store.get("big"), Some(&Value::from(i64::MAX)));
        assert_err!(store.decrement_by("big", i64::MIN));
    }

    #[test]
    fn test_increment_keeps_ttl() {
        let mut store = MemoryStore::new();
        store.set("counter", 1, Some(30));
        store.increment_by("counter", 1).unwrap();
        assert_eq!(store.get_ttl("counter"), 30);
    }
}
