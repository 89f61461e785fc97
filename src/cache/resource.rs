//! One cached value bound to its key, TTL and provider
//!
//! A [`Resource`] is what views hold on to: it publishes the current
//! [`FetchState`] through a watch channel and offers `load` / `refetch`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, TryFutureExt};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;

use super::controller::{CacheFetchController, FetchState};
use super::entry::CacheKey;

type ProviderFn<T> = dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync;

/// A named, cached, asynchronously fetched value
pub struct Resource<T> {
    controller: CacheFetchController,
    key: CacheKey,
    ttl: Duration,
    provider: Arc<ProviderFn<T>>,
    state: Arc<watch::Sender<FetchState<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            key: self.key.clone(),
            ttl: self.ttl,
            provider: Arc::clone(&self.provider),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<T> Resource<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates an idle resource; nothing is fetched until [`load`](Self::load)
    pub fn new<F, Fut, E>(
        controller: CacheFetchController,
        key: CacheKey,
        ttl: Duration,
        provider: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let provider: Arc<ProviderFn<T>> =
            Arc::new(move || provider().map_err(|e| e.to_string()).boxed());
        let (state, _) = watch::channel(FetchState::Idle);

        Self {
            controller,
            key,
            ttl,
            provider,
            state: Arc::new(state),
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Serves from the cache when fresh, fetches otherwise
    pub async fn load(&self) -> FetchState<T> {
        self.run(false).await
    }

    /// Fetches regardless of the cache
    pub async fn refetch(&self) -> FetchState<T> {
        self.run(true).await
    }

    async fn run(&self, force_refresh: bool) -> FetchState<T> {
        let provider = Arc::clone(&self.provider);
        self.controller
            .request_with(
                &self.key,
                self.ttl,
                move || provider(),
                force_refresh,
                |state| {
                    self.state.send_replace(state.clone());
                },
            )
            .await
    }
}
