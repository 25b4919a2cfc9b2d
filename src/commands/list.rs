//! List operations (lPush, lPop, lRange, lPos, lIndex, lLen, lSet, lRem, lRemIndex)
//!
//! Unlike hashes and sets, list accessors refuse a missing key
//! (`InvalidKey`) or a key of another type (`InvalidKeyType`). Only `lpush`
//! coerces and only `lpop` stays silent.

use crate::error::{StoreError, StoreResult};
use crate::store::{MemoryStore, Value};
use std::collections::VecDeque;

impl MemoryStore {
    /// Append values to the tail of the list at `key`, returns the new length
    ///
    /// A missing key is created with the store's default ttl; a key of
    /// another type is discarded and replaced by a fresh list.
    pub fn lpush<I, V>(&mut self, key: &str, values: I) -> usize
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let ttl = self.resolve_ttl(None);
        let value = self.value_or_reset(key, ttl, |v| v.as_list().is_some(), Value::empty_list);
        match value.as_list_mut() {
            Some(list) => {
                list.extend(values.into_iter().map(Into::into));
                list.len()
            }
            None => 0,
        }
    }

    /// Drop the tail element, silently ignoring missing or non-list keys
    pub fn lpop(&mut self, key: &str) {
        if let Some(list) = self.entry_mut(key).and_then(|e| e.value.as_list_mut()) {
            list.pop_back();
        }
    }

    /// Elements in `[start, end)`
    ///
    /// Negative bounds count from the tail and every bound is clamped to the
    /// list, so the range itself never fails.
    pub fn lrange(&mut self, key: &str, start: i64, end: i64) -> StoreResult<Vec<Value>> {
        let list = self.list(key)?;
        let len = list.len();
        let start = clamp_bound(start, len);
        let end = clamp_bound(end, len);

        if start >= end {
            return Ok(Vec::new());
        }
        Ok(list.range(start..end).cloned().collect())
    }

    /// Index of the first element equal to `member`, or -1
    pub fn lpos(&mut self, key: &str, member: &Value) -> StoreResult<i64> {
        let list = self.list(key)?;
        Ok(list
            .iter()
            .position(|v| v == member)
            .map(|pos| pos as i64)
            .unwrap_or(-1))
    }

    /// Element at `index`, None when the index is outside the list
    pub fn lindex(&mut self, key: &str, index: i64) -> StoreResult<Option<&Value>> {
        let list = self.list(key)?;
        if index < 0 {
            return Ok(None);
        }
        Ok(list.get(index as usize))
    }

    pub fn llen(&mut self, key: &str) -> StoreResult<usize> {
        Ok(self.list(key)?.len())
    }

    /// Overwrite the element at `index`
    ///
    /// Only the upper bound is checked: an index past the tail fails with
    /// `OutOfIndex`, a negative index passes and changes nothing.
    pub fn lset(&mut self, key: &str, index: i64, value: impl Into<Value>) -> StoreResult<()> {
        let list = self.list_mut(key)?;
        check_upper_bound(key, index, list.len())?;
        if let Some(slot) = usize::try_from(index).ok().and_then(|i| list.get_mut(i)) {
            *slot = value.into();
        }
        Ok(())
    }

    /// Remove every element equal to `member`, returns how many were removed
    pub fn lrem(&mut self, key: &str, member: &Value) -> StoreResult<usize> {
        let list = self.list_mut(key)?;
        let before = list.len();
        list.retain(|v| v != member);
        Ok(before - list.len())
    }

    /// Remove the element at `index`, shifting later elements down
    ///
    /// Only the upper bound is checked. A negative index counts from the
    /// tail and is clamped to the head.
    pub fn lrem_index(&mut self, key: &str, index: i64) -> StoreResult<()> {
        let list = self.list_mut(key)?;
        check_upper_bound(key, index, list.len())?;
        let pos = if index < 0 {
            clamp_bound(index, list.len())
        } else {
            index as usize
        };
        list.remove(pos);
        Ok(())
    }

    fn list(&mut self, key: &str) -> StoreResult<&VecDeque<Value>> {
        let entry = self.entry(key).ok_or_else(|| StoreError::invalid_key(key))?;
        match &entry.value {
            Value::List(list) => Ok(list),
            other => Err(wrong_type(key, other)),
        }
    }

    fn list_mut(&mut self, key: &str) -> StoreResult<&mut VecDeque<Value>> {
        let entry = self
            .entry_mut(key)
            .ok_or_else(|| StoreError::invalid_key(key))?;
        match &mut entry.value {
            Value::List(list) => Ok(list),
            other => Err(wrong_type(key, other)),
        }
    }
}

fn wrong_type(key: &str, found: &Value) -> StoreError {
    StoreError::InvalidKeyType {
        key: key.to_owned(),
        expected: "list",
        found: found.type_name(),
    }
}

fn check_upper_bound(key: &str, index: i64, len: usize) -> StoreResult<()> {
    if index >= len as i64 {
        return Err(StoreError::OutOfIndex {
            key: key.to_owned(),
            index,
            len,
        });
    }
    Ok(())
}

/// Resolve a slice bound against a list of `len` elements
fn clamp_bound(bound: i64, len: usize) -> usize {
    let len = len as i64;
    let resolved = if bound < 0 { len + bound } else { bound };
    resolved.clamp(0, len) as usize
}
