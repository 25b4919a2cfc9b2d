//! Shared store and background expiration
//!
//! [`SharedStore`] guards one [`MemoryStore`] with a single mutex so that
//! compound operations (`increment_by`, `hset`, ...) stay atomic across
//! threads. [`Reaper`] purges due keys in the background, so expired entries
//! are released even when nobody touches the store.

use crate::config::StoreConfig;
use crate::store::MemoryStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Thread-safe handle to a [`MemoryStore`]
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    pub fn new(store: MemoryStore) -> Self {
        SharedStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::new(MemoryStore::with_config(config))
    }

    /// Run `f` with exclusive access to the store
    ///
    /// Everything inside `f` is one atomic step for other handles.
    pub fn with<R>(&self, f: impl FnOnce(&mut MemoryStore) -> R) -> R {
        let mut store = self.lock();
        f(&mut store)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStore> {
        // A panic inside `with` cannot leave an entry half-written, so the
        // store stays usable after poisoning
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<MemoryStore> for SharedStore {
    fn from(store: MemoryStore) -> Self {
        Self::new(store)
    }
}

/// Background task that removes expired keys
///
/// Sleeps until the earliest pending deadline, but never longer than
/// `interval`, so deadlines armed while it sleeps are picked up on the
/// next pass.
pub struct Reaper {
    store: SharedStore,
    interval: Duration,
    shutdown: CancellationToken,
}

impl Reaper {
    /// Create a new reaper
    pub fn new(store: SharedStore, interval: Duration) -> Self {
        Self {
            store,
            interval,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the reaper when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the reaper (should be spawned as a task)
    pub async fn run(self) {
        info!("Reaper started, interval: {:?}", self.interval);

        loop {
            let (removed, next) = self
                .store
                .with(|store| (store.purge_expired(), store.next_deadline()));
            if removed > 0 {
                debug!(removed = removed, "Reaped expired keys");
            }

            let ceiling = Instant::now() + self.interval;
            let wake = next.map(|deadline| deadline.min(ceiling)).unwrap_or(ceiling);

            tokio::select! {
                _ = sleep_until(wake) => {}
                _ = self.shutdown.cancelled() => break,
            }
        }

        info!("Reaper stopped");
    }

    /// Spawn a reaper as a background task
    pub fn spawn(store: SharedStore, interval: Duration) -> ReaperHandle {
        let reaper = Self::new(store, interval);
        let shutdown = reaper.shutdown_token();
        let task = tokio::spawn(reaper.run());
        ReaperHandle { shutdown, task }
    }

    /// Spawn a reaper whose interval comes from `config.reaper_interval_ms`
    pub fn spawn_with_config(store: SharedStore, config: &StoreConfig) -> ReaperHandle {
        Self::spawn(store, config.reaper_interval())
    }
}

/// Handle to a spawned [`Reaper`]
pub struct ReaperHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Stop the reaper and wait for it to finish
    pub async fn stop(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
    }
}
