//! Request coalescer (C5, spec §4.7): a "future registry" keyed by the
//! same string the full-result cache uses. A validation that starts while
//! an identical one is in flight attaches to it instead of duplicating the
//! work; the in-flight entry is removed once the shared computation settles.
//!
//! The computation is handed to `tokio::spawn` immediately, before anyone
//! starts polling the shared handle, so a caller detaching early (timeout,
//! dropped future) never starves the work other callers are waiting on —
//! the task keeps running on the runtime regardless of who's still polling it.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;

pub struct Coalescer<T: Clone + Send + 'static> {
    inflight: Mutex<HashMap<String, Shared<BoxFuture<'static, T>>>>,
}

impl<T: Clone + Send + 'static> Default for Coalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Coalescer<T> {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `compute` under `key`, or attaches to an already-running
    /// computation under the same key. `compute` only runs if this call is
    /// the one that installs the entry.
    pub async fn run<F, Fut>(&self, key: impl Into<String>, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let key = key.into();
        let (shared, is_owner) = {
            let mut guard = self.inflight.lock().await;
            if let Some(existing) = guard.get(&key) {
                (existing.clone(), false)
            } else {
                let handle = tokio::spawn(compute());
                let fut = async move { handle.await.expect("coalesced computation panicked") }
                    .boxed()
                    .shared();
                guard.insert(key.clone(), fut.clone());
                (fut, true)
            }
        };

        let result = shared.await;
        if is_owner {
            self.inflight.lock().await.remove(&key);
        }
        result
    }

    #[cfg(test)]
    async fn inflight_count(&self) -> usize {
        self.inflight.lock().await.len()
    }
}
