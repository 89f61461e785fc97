//! The seam between cached resources and whatever produces their values

use chrono::NaiveDate;
use futures::future::{BoxFuture, FutureExt, TryFutureExt};

use super::{DailyReadings, GeminiClient, Prayer, SaintOfDay};

/// A provider call; the error is already rendered for display
pub type ProviderFuture<T> = BoxFuture<'static, Result<T, String>>;

/// Produces fresh content for the cached resources
///
/// Each call returns a future that owns everything it needs, so it can be
/// shared between several waiting requests.
pub trait ContentProvider: Send + Sync {
    fn prayers(&self) -> ProviderFuture<Vec<Prayer>>;

    fn daily_readings(&self, date: NaiveDate) -> ProviderFuture<DailyReadings>;

    fn prayer_of_day(&self, date: NaiveDate) -> ProviderFuture<Prayer>;

    fn saint_of_day(&self, date: NaiveDate) -> ProviderFuture<SaintOfDay>;

    /// A short explanation of the passage at `citation`
    fn reading_explanation(&self, citation: &str) -> ProviderFuture<String>;
}

impl ContentProvider for GeminiClient {
    fn prayers(&self) -> ProviderFuture<Vec<Prayer>> {
        let client = self.clone();
        async move { client.fetch_prayers().await }
            .map_err(|e| e.to_string())
            .boxed()
    }

    fn daily_readings(&self, date: NaiveDate) -> ProviderFuture<DailyReadings> {
        let client = self.clone();
        async move { client.fetch_daily_readings(date).await }
            .map_err(|e| e.to_string())
            .boxed()
    }

    fn prayer_of_day(&self, date: NaiveDate) -> ProviderFuture<Prayer> {
        let client = self.clone();
        async move { client.fetch_prayer_of_day(date).await }
            .map_err(|e| e.to_string())
            .boxed()
    }

    fn saint_of_day(&self, date: NaiveDate) -> ProviderFuture<SaintOfDay> {
        let client = self.clone();
        async move { client.fetch_saint_of_day(date).await }
            .map_err(|e| e.to_string())
            .boxed()
    }

    fn reading_explanation(&self, citation: &str) -> ProviderFuture<String> {
        let client = self.clone();
        let citation = citation.to_string();
        async move { client.fetch_reading_explanation(&citation).await }
            .map_err(|e| e.to_string())
            .boxed()
    }
}
