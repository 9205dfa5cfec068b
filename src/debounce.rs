//! Per-document cancel-and-reschedule timer.
//!
//! Scheduling a task for a key aborts whatever was still waiting for that key,
//! so a burst of edits leads to a single run after the last one. At most one
//! task per key is pending at any time.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct Debouncer<K> {
    pending: Arc<Mutex<HashMap<K, Pending>>>,
    generation: AtomicU64,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Debouncer {
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Hash + Eq + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any task still pending for `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: K, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let pending = self.pending.clone();
        let own_key = key.clone();

        // The lock is held across spawn so the new task cannot look for its
        // entry before it has been inserted.
        let mut map = self.pending.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut map = pending.lock();
                if map.get(&own_key).map_or(false, |p| p.generation == generation) {
                    map.remove(&own_key);
                }
            }
            task.await;
        });
        if let Some(previous) = map.insert(key, Pending { generation, handle }) {
            previous.handle.abort();
        }
    }

    /// Drop the pending task for `key`, if any. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        match self.pending.lock().remove(key) {
            Some(previous) => {
                previous.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, previous) in self.pending.lock().drain() {
            previous.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.lock().contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
