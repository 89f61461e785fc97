//! Cached fetch controller
//!
//! [`CacheFetchController`] wraps calls to a remote provider with a
//! time-bounded cache in a [`KeyValueStore`]. A request is answered from the
//! cache while the stored entry is fresh; otherwise the provider is called,
//! the result persisted on success, and the outcome reported as a
//! [`FetchState`]. Failures never propagate as errors and never touch the
//! stored entry.
//!
//! At most one provider call per key is outstanding at a time: requests that
//! arrive while a fetch is running join it and observe its result.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::entry::{CacheEntry, CacheKey};
use super::store::KeyValueStore;

/// What a consumer sees of one cached value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Nothing has been requested yet
    Idle,
    /// The provider is being called
    Loading,
    /// A value is available, either cached or freshly fetched
    Success(T),
    /// The provider failed; the message is meant for display
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// A provider call that several requests can await together
type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, String>>>;

/// Bookkeeping for a running provider call
struct InFlight {
    /// Distinguishes this call from a later one under the same key
    id: u64,
    /// A `SharedFetch<T>` for the value type of the key
    fetch: Box<dyn Any + Send + Sync>,
}

/// Outcome of the synchronous part of a request
enum Lookup<T> {
    Hit(T),
    Fetch(SharedFetch<T>),
}

struct Inner {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<HashMap<String, InFlight>>,
    next_id: AtomicU64,
    /// Bumped every time an in-flight slot is released
    finished: AtomicU64,
}

/// Serves values from a TTL cache and calls the provider on a miss
///
/// Cheap to clone; clones share the store and the in-flight table.
#[derive(Clone)]
pub struct CacheFetchController {
    inner: Arc<Inner>,
}

impl fmt::Debug for CacheFetchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFetchController")
            .field("store", &self.inner.store)
            .field("clock", &self.inner.clock)
            .finish_non_exhaustive()
    }
}

impl CacheFetchController {
    /// Creates a controller over `store` using wall-clock time
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a controller with a custom time source
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                clock,
                in_flight: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                finished: AtomicU64::new(0),
            }),
        }
    }

    /// The store entries are persisted to
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    /// Whether a provider call for `key` is currently running
    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.inner.lock_in_flight().contains_key(key.as_str())
    }

    /// Produces the value for `key`, calling `provider` only when needed
    ///
    /// With `force_refresh` the cached entry is ignored for reading (but kept
    /// until a successful fetch overwrites it).
    pub async fn request<T, F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        provider: F,
        force_refresh: bool,
    ) -> FetchState<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        self.request_with(key, ttl, provider, force_refresh, |_| {}).await
    }

    /// Same as [`request`](Self::request) with `force_refresh = true`
    pub async fn refetch<T, F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        provider: F,
    ) -> FetchState<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        self.request(key, ttl, provider, true).await
    }

    /// Like [`request`](Self::request), reporting every state transition to `observe`
    ///
    /// A cache hit reports `Success` only. A miss reports `Loading` followed by
    /// `Success` or `Error`. The final state is also returned.
    pub async fn request_with<T, F, Fut, E, O>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        provider: F,
        force_refresh: bool,
        mut observe: O,
    ) -> FetchState<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
        O: FnMut(&FetchState<T>),
    {
        let fetch = match self.lookup(key, ttl, provider, force_refresh) {
            Lookup::Hit(value) => {
                let state = FetchState::Success(value);
                observe(&state);
                return state;
            }
            Lookup::Fetch(fetch) => fetch,
        };

        observe(&FetchState::Loading);

        let state = match fetch.await {
            Ok(value) => FetchState::Success(value),
            Err(message) => FetchState::Error(message),
        };
        observe(&state);
        state
    }

    /// Answers from the cache or hands back the fetch to await
    ///
    /// The store is read without holding the in-flight lock. If a fetch for
    /// any key finished between that read and taking the lock, the lookup
    /// starts over so a value written by that fetch is not missed. `provider`
    /// is invoked under the lock and should only build its future.
    fn lookup<T, F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        provider: F,
        force_refresh: bool,
    ) -> Lookup<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        loop {
            let finished_before = self.inner.finished.load(Ordering::SeqCst);

            if !force_refresh {
                if let Some(value) = self.inner.read_fresh::<T>(key, ttl) {
                    return Lookup::Hit(value);
                }
            }

            let mut in_flight = self.inner.lock_in_flight();

            if let Some(running) = in_flight.get(key.as_str()) {
                match running.fetch.downcast_ref::<SharedFetch<T>>() {
                    Some(fetch) => {
                        debug!(%key, "joining in-flight fetch");
                        return Lookup::Fetch(fetch.clone());
                    }
                    None => {
                        warn!(%key, "in-flight fetch has another value type, starting a new one")
                    }
                }
            }

            if !force_refresh && self.inner.finished.load(Ordering::SeqCst) != finished_before {
                debug!(%key, "a fetch finished during lookup, reading the cache again");
                continue;
            }

            let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
            let fetch = self.start(key, id, provider());
            let replaced = in_flight.insert(
                key.as_str().to_string(),
                InFlight {
                    id,
                    fetch: Box::new(fetch.clone()),
                },
            );
            drop(in_flight);
            drop(replaced);

            return Lookup::Fetch(fetch);
        }
    }

    /// Wraps the provider future so that it persists on success and clears its
    /// in-flight slot when done, whoever ends up polling it
    ///
    /// A panicking provider is reported as an error and still frees the slot.
    fn start<T, Fut, E>(&self, key: &CacheKey, id: u64, fetch: Fut) -> SharedFetch<T>
    where
        T: Serialize + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let guard = FinishGuard {
            inner: Arc::clone(&self.inner),
            key: key.clone(),
            id,
        };
        debug!(%key, "calling provider");

        async move {
            let key = &guard.key;
            match AssertUnwindSafe(fetch).catch_unwind().await {
                Ok(Ok(value)) => {
                    guard.inner.persist(key, &value);
                    Ok(value)
                }
                Ok(Err(err)) => {
                    let message = err.to_string();
                    warn!(%key, error = %message, "provider failed");
                    Err(message)
                }
                Err(_) => {
                    warn!(%key, "provider panicked");
                    Err(PROVIDER_PANICKED.to_string())
                }
            }
        }
        .boxed()
        .shared()
    }
}

/// Error message reported when the provider future panics
const PROVIDER_PANICKED: &str = "provider panicked";

/// Releases the in-flight slot of one fetch when dropped
struct FinishGuard {
    inner: Arc<Inner>,
    key: CacheKey,
    id: u64,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.inner.finish(&self.key, self.id);
    }
}

impl Inner {
    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored value if it decodes and is fresh
    ///
    /// Undecodable entries are removed so the next write starts clean.
    fn read_fresh<T: DeserializeOwned>(&self, key: &CacheKey, ttl: Duration) -> Option<T> {
        let bytes = match self.store.get(key.as_str()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(%key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match CacheEntry::<T>::decode(&bytes) {
            Ok(entry) if entry.is_fresh(self.clock.now(), ttl) => {
                debug!(%key, stored_at = %entry.stored_at, "cache hit");
                Some(entry.value)
            }
            Ok(entry) => {
                debug!(%key, stored_at = %entry.stored_at, "cache entry stale");
                None
            }
            Err(e) => {
                warn!(%key, error = %e, "discarding corrupted cache entry");
                if let Err(e) = self.store.remove(key.as_str()) {
                    warn!(%key, error = %e, "failed to remove corrupted cache entry");
                }
                None
            }
        }
    }

    fn persist<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let entry = CacheEntry::new(value, self.clock.now());
        let written = match entry.encode() {
            Ok(bytes) => self
                .store
                .set(key.as_str(), &bytes)
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => debug!(%key, stored_at = %entry.stored_at, "cache entry written"),
            Err(e) => warn!(%key, error = %e, "failed to persist fetched value"),
        }
    }

    /// Drops the in-flight slot for `key` if it still belongs to call `id`
    fn finish(&self, key: &CacheKey, id: u64) {
        let mut in_flight = self.lock_in_flight();
        let owned = in_flight
            .get(key.as_str())
            .is_some_and(|running| running.id == id);
        let removed = if owned {
            in_flight.remove(key.as_str())
        } else {
            None
        };
        self.finished.fetch_add(1, Ordering::SeqCst);
        drop(in_flight);
        drop(removed);
    }
}
