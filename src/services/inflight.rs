//! Collapses concurrent fetches for the same key into one.
//!
//! The first caller for a key spawns the work on its own task; later callers
//! receive a clone of the same `Shared` handle and therefore observe the same
//! output. The work runs to completion even if every caller goes away, and
//! the registration is removed as soon as it settles, so the next caller
//! after that starts fresh.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

/// The spawned work did not produce an output (it panicked or was
/// cancelled with the runtime).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("in-flight task failed: {0}")]
pub struct InFlightError(String);

/// Handle to a possibly shared piece of in-progress work.
pub type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, InFlightError>>>;

type Registry<K, T> = Arc<Mutex<HashMap<K, SharedFetch<T>>>>;

pub struct InFlight<K, T>
where
    T: Clone,
{
    pending: Registry<K, T>,
}

impl<K, T> InFlight<K, T>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Join the pending work for `key`, or spawn it with `start`.
    ///
    /// Must be called from within a tokio runtime. `start` runs at most once
    /// per settled cycle, under the registry lock, so it must only construct
    /// the future, not drive it.
    pub fn join<F, Fut>(&self, key: K, start: F) -> SharedFetch<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(existing) = pending.get(&key) {
            return existing.clone();
        }

        let work = start();
        let registry = Arc::clone(&self.pending);
        let registered_key = key.clone();
        // The lock is held until the entry is inserted below, so the task
        // cannot remove it before it exists.
        let handle = tokio::spawn(async move {
            let output = work.await;
            registry.lock().remove(&registered_key);
            output
        });

        let registry = Arc::clone(&self.pending);
        let registered_key = key.clone();
        let shared = async move {
            handle.await.map_err(|e| {
                // A panicked task never reached its own cleanup.
                registry.lock().remove(&registered_key);
                InFlightError(e.to_string())
            })
        }
        .boxed()
        .shared();

        pending.insert(key, shared.clone());
        shared
    }

    /// Number of keys with work in progress.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<K, T> Default for InFlight<K, T>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
