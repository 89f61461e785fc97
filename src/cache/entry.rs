//! Cache keys and the on-disk entry format

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Identifies one cache slot
///
/// Keys are compared as plain strings; the same string always addresses the
/// same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// A key for a resource that does not vary over time (e.g., `"prayers"`)
    pub fn fixed(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A key partitioned by calendar day (e.g., `"daily-readings-2026-10-18"`)
    pub fn daily(name: &str, date: NaiveDate) -> Self {
        Self(format!("{}-{}", name, date.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wrapper stored for every successfully fetched value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The fetched payload
    pub value: T,
    /// When the payload was fetched
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, stored_at: DateTime<Utc>) -> Self {
        Self { value, stored_at }
    }

    /// Whether the entry is still usable at `now` under `ttl`
    ///
    /// Fresh iff `now - stored_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.stored_at) < ttl
    }
}

impl<T: Serialize> CacheEntry<T> {
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

impl<T: DeserializeOwned> CacheEntry<T> {
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
