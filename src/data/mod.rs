//! Core data models for prayers, daily readings and saints
//!
//! These types are produced by the Gemini provider and stored in the cache as
//! JSON, so field names follow the provider's camelCase schema.

pub mod bundled;
pub mod gemini;
pub mod provider;
pub mod saints;

pub use bundled::{
    bundled_explanation, bundled_prayer_of_day, bundled_prayers, bundled_readings,
    bundled_saint_of_day,
};
pub use gemini::{GeminiClient, GeminiError};
pub use provider::{ContentProvider, ProviderFuture};
pub use saints::{month_name, saint_on, saints_in_month, search_saints, Saint};

use serde::{Deserialize, Serialize};

/// A prayer from the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prayer {
    /// Title, also used as the prayer's identity for favorites
    pub title: String,
    /// Category (e.g., "Basic Prayers", "Marian Prayers")
    pub category: String,
    /// Full text
    pub text: String,
}

/// One scripture passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Biblical citation (e.g., "Mark 6:34-44")
    pub citation: String,
    /// Full text of the passage
    pub text: String,
}

/// The readings of the Mass for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReadings {
    /// Date as written by the provider (e.g., "October 18, 2026")
    pub date: String,
    /// Feast or liturgical day
    pub feast: String,
    pub first_reading: Reading,
    pub responsorial_psalm: Reading,
    /// Only present on Sundays and solemnities
    #[serde(default)]
    pub second_reading: Option<Reading>,
    pub gospel: Reading,
}

impl DailyReadings {
    /// Headed readings in the order they are proclaimed
    pub fn sections(&self) -> Vec<(&'static str, &Reading)> {
        let mut sections = vec![
            ("First Reading", &self.first_reading),
            ("Responsorial Psalm", &self.responsorial_psalm),
        ];
        if let Some(second) = &self.second_reading {
            sections.push(("Second Reading", second));
        }
        sections.push(("Gospel", &self.gospel));
        sections
    }
}

/// The saint commemorated on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaintOfDay {
    pub name: String,
    /// A few sentences on the saint's life
    pub description: String,
}
