//! Cached resources behind the views
//!
//! [`Sources`] binds the cache controller, the content provider and the
//! configured TTLs, and hands out one [`Resource`] per cache key.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::cache::{CacheFetchController, CacheKey, Resource};
use crate::config::Settings;
use crate::data::{ContentProvider, DailyReadings, Prayer, SaintOfDay};

/// Cache key of the prayer list
pub const PRAYERS_KEY: &str = "prayers";

/// Cache key prefix of a day's readings
pub const READINGS_KEY: &str = "daily-readings";

/// Cache key prefix of a day's prayer
pub const PRAYER_OF_DAY_KEY: &str = "prayer-of-day";

/// Cache key prefix of a day's saint
pub const SAINT_OF_DAY_KEY: &str = "saint-of-day";

/// Cache key prefix of a passage explanation, followed by the citation
pub const EXPLANATION_KEY: &str = "reading-explanation";

/// Builds resources that share one controller and one provider
#[derive(Clone)]
pub struct Sources {
    controller: CacheFetchController,
    provider: Arc<dyn ContentProvider>,
    prayers_ttl: Duration,
    daily_ttl: Duration,
    explanation_ttl: Duration,
}

/// The resources that change with the calendar day
#[derive(Debug, Clone)]
pub struct Daily {
    pub date: NaiveDate,
    pub readings: Resource<DailyReadings>,
    pub prayer_of_day: Resource<Prayer>,
    pub saint_of_day: Resource<SaintOfDay>,
}

impl Sources {
    pub fn new(
        controller: CacheFetchController,
        provider: Arc<dyn ContentProvider>,
        settings: &Settings,
    ) -> Self {
        Self {
            controller,
            provider,
            prayers_ttl: settings.prayers_ttl,
            daily_ttl: settings.readings_ttl,
            explanation_ttl: settings.explanation_ttl,
        }
    }

    pub fn controller(&self) -> &CacheFetchController {
        &self.controller
    }

    pub fn prayers(&self) -> Resource<Vec<Prayer>> {
        let provider = Arc::clone(&self.provider);
        Resource::new(
            self.controller.clone(),
            CacheKey::fixed(PRAYERS_KEY),
            self.prayers_ttl,
            move || provider.prayers(),
        )
    }

    pub fn readings(&self, date: NaiveDate) -> Resource<DailyReadings> {
        let provider = Arc::clone(&self.provider);
        Resource::new(
            self.controller.clone(),
            CacheKey::daily(READINGS_KEY, date),
            self.daily_ttl,
            move || provider.daily_readings(date),
        )
    }

    pub fn prayer_of_day(&self, date: NaiveDate) -> Resource<Prayer> {
        let provider = Arc::clone(&self.provider);
        Resource::new(
            self.controller.clone(),
            CacheKey::daily(PRAYER_OF_DAY_KEY, date),
            self.daily_ttl,
            move || provider.prayer_of_day(date),
        )
    }

    pub fn saint_of_day(&self, date: NaiveDate) -> Resource<SaintOfDay> {
        let provider = Arc::clone(&self.provider);
        Resource::new(
            self.controller.clone(),
            CacheKey::daily(SAINT_OF_DAY_KEY, date),
            self.daily_ttl,
            move || provider.saint_of_day(date),
        )
    }

    /// The explanation of one passage; the key does not depend on the day
    pub fn explanation(&self, citation: &str) -> Resource<String> {
        let provider = Arc::clone(&self.provider);
        let owned = citation.to_string();
        Resource::new(
            self.controller.clone(),
            CacheKey::fixed(format!("{}-{}", EXPLANATION_KEY, citation)),
            self.explanation_ttl,
            move || provider.reading_explanation(&owned),
        )
    }

    /// Everything keyed by `date`
    pub fn daily(&self, date: NaiveDate) -> Daily {
        Daily {
            date,
            readings: self.readings(date),
            prayer_of_day: self.prayer_of_day(date),
            saint_of_day: self.saint_of_day(date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::FakeProvider;
    use crate::cache::{FetchState, MemoryStore};
    use std::path::PathBuf;

    fn sources(provider: Arc<FakeProvider>) -> Sources {
        let settings = Settings::with_cache_dir(PathBuf::from("/tmp/missal"));
        let controller = CacheFetchController::new(Arc::new(MemoryStore::new()));
        Sources::new(controller, provider, &settings)
    }

    #[test]
    fn test_keys_follow_naming_scheme() {
        let sources = sources(Arc::new(FakeProvider::default()));
        let daily = sources.daily(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        assert_eq!(sources.prayers().key().as_str(), "prayers");
        assert_eq!(daily.readings.key().as_str(), "daily-readings-2026-10-18");
        assert_eq!(daily.prayer_of_day.key().as_str(), "prayer-of-day-2026-10-18");
        assert_eq!(daily.saint_of_day.key().as_str(), "saint-of-day-2026-10-18");
        assert_eq!(
            sources.explanation("Mark 10:35-45").key().as_str(),
            "reading-explanation-Mark 10:35-45"
        );
    }

    #[tokio::test]
    async fn test_explanation_is_cached_per_citation() {
        let provider = Arc::new(FakeProvider::default());
        let sources = sources(Arc::clone(&provider));

        let first = sources.explanation("John 3:16").load().await;
        let again = sources.explanation("John 3:16").load().await;
        sources.explanation("Luke 1:26-38").load().await;

        assert_eq!(first, FetchState::Success("About John 3:16".to_string()));
        assert_eq!(again, first);
        assert_eq!(provider.calls(), 2);
    }
}
