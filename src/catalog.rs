//! Prayer catalogue filtering and favorites
//!
//! Filtering is a pure predicate over the in-memory prayer list. Favorites are
//! keyed by prayer title and persisted as one JSON blob in the key-value store.

use std::collections::BTreeSet;

use crate::cache::{KeyValueStore, StorageError};
use crate::data::Prayer;

/// Label for the "no category filter" choice
pub const ALL_CATEGORIES: &str = "All";

/// Store key holding the favorite titles
pub const FAVORITES_KEY: &str = "prayer-favorites";

/// Returns `All` followed by the distinct categories in sorted order
pub fn categories(prayers: &[Prayer]) -> Vec<String> {
    let distinct: BTreeSet<&str> = prayers.iter().map(|p| p.category.as_str()).collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

/// Search, category and favorites criteria for the prayer list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrayerFilter {
    /// Case-insensitive substring matched against title and text
    pub query: String,
    /// `None` means all categories
    pub category: Option<String>,
    /// Only show favorites
    pub favorites_only: bool,
}

impl PrayerFilter {
    /// Whether `prayer` passes every criterion
    pub fn matches(&self, prayer: &Prayer, favorites: &Favorites) -> bool {
        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |category| prayer.category == category);

        let query = self.query.to_lowercase();
        let matches_search = prayer.title.to_lowercase().contains(&query)
            || prayer.text.to_lowercase().contains(&query);

        let matches_favorite = !self.favorites_only || favorites.contains(&prayer.title);

        matches_category && matches_search && matches_favorite
    }

    /// Prayers that pass the filter, in their original order
    pub fn apply<'a>(&self, prayers: &'a [Prayer], favorites: &Favorites) -> Vec<&'a Prayer> {
        prayers
            .iter()
            .filter(|prayer| self.matches(prayer, favorites))
            .collect()
    }

    /// Label of the selected category
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }

    /// Moves to the next entry of `categories`, wrapping back to `All`
    ///
    /// `categories` is the list from [`categories`], starting with `All`.
    pub fn cycle_category(&mut self, categories: &[String]) {
        let current = categories
            .iter()
            .position(|c| c == self.category_label())
            .unwrap_or(0);
        let next = categories
            .get(current + 1)
            .filter(|c| c.as_str() != ALL_CATEGORIES);
        self.category = next.cloned();
    }
}

/// The set of favorite prayer titles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    titles: BTreeSet<String>,
}

impl Favorites {
    /// Loads favorites from `store`
    ///
    /// A missing or unreadable blob yields an empty set.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let bytes = match store.get(FAVORITES_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read favorites");
                return Self::default();
            }
        };

        match serde_json::from_slice::<BTreeSet<String>>(&bytes) {
            Ok(titles) => Self { titles },
            Err(e) => {
                tracing::warn!(error = %e, "ignoring corrupted favorites");
                Self::default()
            }
        }
    }

    /// Writes favorites to `store`
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&self.titles)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        store.set(FAVORITES_KEY, &bytes)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Flips the favorite flag for `title`; returns the new flag
    pub fn toggle(&mut self, title: &str) -> bool {
        if self.titles.remove(title) {
            false
        } else {
            self.titles.insert(title.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    fn prayer(title: &str, category: &str, text: &str) -> Prayer {
        Prayer {
            title: title.to_string(),
            category: category.to_string(),
            text: text.to_string(),
        }
    }

    fn sample() -> Vec<Prayer> {
        vec![
            prayer("Our Father", "Basic Prayers", "Our Father, who art in heaven"),
            prayer("Hail Mary", "Marian Prayers", "Hail Mary, full of grace"),
            prayer("Memorare", "Marian Prayers", "Remember, O most gracious Virgin Mary"),
            prayer("Prayer to St. Michael", "Prayers to Saints", "defend us in battle"),
        ]
    }

    fn titles(prayers: Vec<&Prayer>) -> Vec<&str> {
        prayers.into_iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_categories_start_with_all_and_are_sorted() {
        assert_eq!(
            categories(&sample()),
            vec!["All", "Basic Prayers", "Marian Prayers", "Prayers to Saints"]
        );
        assert_eq!(categories(&[]), vec!["All"]);
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let prayers = sample();
        let result = PrayerFilter::default().apply(&prayers, &Favorites::default());
        assert_eq!(result.len(), prayers.len());
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_text() {
        let prayers = sample();
        let filter = PrayerFilter {
            query: "MARY".to_string(),
            ..Default::default()
        };

        let result = filter.apply(&prayers, &Favorites::default());

        // "Hail Mary" by title, "Memorare" by text
        assert_eq!(titles(result), vec!["Hail Mary", "Memorare"]);
    }

    #[test]
    fn test_category_and_search_combine() {
        let prayers = sample();
        let filter = PrayerFilter {
            query: "grace".to_string(),
            category: Some("Marian Prayers".to_string()),
            favorites_only: false,
        };

        let result = filter.apply(&prayers, &Favorites::default());

        assert_eq!(titles(result), vec!["Hail Mary"]);
    }

    #[test]
    fn test_no_match_yields_empty_list() {
        let prayers = sample();
        let filter = PrayerFilter {
            query: "novena".to_string(),
            ..Default::default()
        };
        assert!(filter.apply(&prayers, &Favorites::default()).is_empty());
    }

    #[test]
    fn test_favorites_only_narrows_list() {
        let prayers = sample();
        let mut favorites = Favorites::default();
        favorites.toggle("Memorare");
        let filter = PrayerFilter {
            favorites_only: true,
            ..Default::default()
        };

        assert_eq!(titles(filter.apply(&prayers, &favorites)), vec!["Memorare"]);
    }

    #[test]
    fn test_cycle_category_wraps_to_all() {
        let cats = categories(&sample());
        let mut filter = PrayerFilter::default();

        filter.cycle_category(&cats);
        assert_eq!(filter.category_label(), "Basic Prayers");
        filter.cycle_category(&cats);
        assert_eq!(filter.category_label(), "Marian Prayers");
        filter.cycle_category(&cats);
        assert_eq!(filter.category_label(), "Prayers to Saints");
        filter.cycle_category(&cats);
        assert_eq!(filter.category_label(), "All");
        assert!(filter.category.is_none());
    }

    #[test]
    fn test_cycle_category_from_unknown_category_moves_to_first() {
        let cats = categories(&sample());
        let mut filter = PrayerFilter {
            category: Some("Novenas".to_string()),
            ..Default::default()
        };

        filter.cycle_category(&cats);

        assert_eq!(filter.category_label(), "Basic Prayers");
    }

    #[test]
    fn test_toggle_favorite_flips_state() {
        let mut favorites = Favorites::default();

        assert!(favorites.toggle("Hail Mary"));
        assert!(favorites.contains("Hail Mary"));
        assert!(!favorites.toggle("Hail Mary"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_favorites_persist_through_store() {
        let store = MemoryStore::new();
        let mut favorites = Favorites::default();
        favorites.toggle("Our Father");
        favorites.toggle("Memorare");

        favorites.save(&store).unwrap();
        let loaded = Favorites::load(&store);

        assert_eq!(loaded, favorites);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_corrupted_favorites_load_as_empty() {
        let store = MemoryStore::new();
        store.set(FAVORITES_KEY, b"{not valid").unwrap();

        assert!(Favorites::load(&store).is_empty());
    }
}
