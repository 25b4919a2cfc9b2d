//! Expiration scheduling
//!
//! Every ttl-bearing entry owns exactly one [`TimerHandle`] into this queue.
//! Replacing or re-arming an entry cancels its handle before a new one is
//! scheduled, so a stale deadline can never remove a key that was rewritten.

use std::collections::BTreeMap;
use tokio::time::Instant;
use tracing::trace;

/// Handle to one scheduled expiration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    deadline: Instant,
    id: u64,
}

impl TimerHandle {
    /// Absolute time at which the timer fires
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// Deadline-ordered queue of pending expirations
#[derive(Debug, Default)]
pub struct ExpiryQueue {
    timers: BTreeMap<(Instant, u64), String>,
    next_id: u64,
}

impl ExpiryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to expire at `deadline`
    pub fn schedule(&mut self, key: &str, deadline: Instant) -> TimerHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.insert((deadline, id), key.to_owned());
        trace!(key, id, "expiration timer armed");
        TimerHandle { deadline, id }
    }

    /// Cancel a timer, returns false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.timers.remove(&(handle.deadline, handle.id)).is_some();
        if removed {
            trace!(id = handle.id, "expiration timer cancelled");
        }
        removed
    }

    /// Remove and return every timer due at `now`
    pub fn drain_due(&mut self, now: Instant) -> Vec<(TimerHandle, String)> {
        let mut due = Vec::new();
        while let Some(entry) = self.timers.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            let key = entry.remove();
            due.push((TimerHandle { deadline, id }, key));
        }
        due
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
