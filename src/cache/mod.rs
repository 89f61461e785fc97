//! Cache module for wrapping remote fetches
//!
//! The [`CacheFetchController`] answers requests from a durable key-value
//! store while entries are fresh, calls the provider otherwise, and reports
//! the outcome as a [`FetchState`] instead of an error. [`Resource`] binds one
//! key, TTL and provider together for the views.

mod clock;
mod controller;
mod entry;
mod resource;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{CacheFetchController, FetchState};
pub use entry::{CacheEntry, CacheKey};
pub use resource::Resource;
pub use store::{default_cache_dir, FileStore, KeyValueStore, MemoryStore, StorageError};
