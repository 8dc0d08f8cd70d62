//! Single-flight tracking for remote loads
//!
//! The first caller for a key starts the load; anyone asking for the same key
//! while it is running awaits the same shared future instead of starting
//! another. The entry is dropped once the load resolves, or once every caller
//! waiting on it has gone away.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

type SharedLoad<T> = Shared<BoxFuture<'static, T>>;

/// Map from key to the load currently running for it
pub struct InFlight<K, T>
where
    T: Clone,
{
    pending: Mutex<HashMap<K, SharedLoad<T>>>,
}

impl<K, T> Default for InFlight<K, T>
where
    T: Clone,
{
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, T> InFlight<K, T>
where
    K: Eq + Hash + Clone + Debug,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, SharedLoad<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `load` for `key`, or join the load already running for it.
    ///
    /// `load` is only invoked when no load for `key` is pending. If the last
    /// caller awaiting a load is cancelled, the load is abandoned and the next
    /// caller starts a fresh one.
    pub async fn run<F, Fut>(&self, key: K, load: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = match self.lock().entry(key.clone()) {
            Entry::Occupied(existing) => {
                log::debug!("Joining in-flight load for {:?}", key);
                existing.get().clone()
            }
            Entry::Vacant(slot) => slot.insert(load().boxed().shared()).clone(),
        };

        let mut waiter = Waiter {
            pending: &self.pending,
            key,
            running: shared.clone(),
            load: shared,
            finished: false,
        };
        let result = (&mut waiter.running).await;
        waiter.finished = true;
        result
    }

    /// Number of loads currently pending
    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// One caller's interest in a pending load; releases the map entry on drop
struct Waiter<'a, K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    pending: &'a Mutex<HashMap<K, SharedLoad<T>>>,
    key: K,
    /// Never polled; identifies the map entry this caller joined
    load: SharedLoad<T>,
    /// The handle this caller polls
    running: SharedLoad<T>,
    finished: bool,
}

impl<K, T> Drop for Waiter<'_, K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let ours = pending
            .get(&self.key)
            .is_some_and(|current| current.ptr_eq(&self.load));
        if !ours {
            return;
        }
        // The map entry plus this caller's two handles means nobody else is waiting
        let abandoned = self.load.strong_count().is_some_and(|count| count <= 3);
        if self.finished || abandoned {
            pending.remove(&self.key);
        }
    }
}
