//! Runtime settings
//!
//! Settings are resolved once at start-up. CLI flags win over environment
//! variables (handled by clap's `env` support), which win over the defaults
//! below.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;
use thiserror::Error;

use crate::cache::default_cache_dir;
use crate::cli::Cli;
use crate::data::gemini::{DEFAULT_MODEL, GEMINI_BASE_URL};

/// How long fetched prayers stay fresh
pub const PRAYERS_TTL_DAYS: i64 = 7;

/// How long fetched readings, prayer of the day and saint of the day stay fresh
pub const READINGS_TTL_DAYS: i64 = 1;

/// How long an explanation of a passage stays fresh
pub const EXPLANATION_TTL_DAYS: i64 = 30;

/// Timeout for a single provider request
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Error types for settings resolution
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform cache directory and none given on the command line
    #[error("Could not determine a cache directory; pass --cache-dir")]
    NoCacheDir,
}

/// Resolved runtime settings
#[derive(Clone)]
pub struct Settings {
    /// Gemini API key, if configured
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Gemini REST base URL
    pub base_url: String,
    /// Freshness window for the prayer list
    pub prayers_ttl: Duration,
    /// Freshness window for a day's readings, prayer and saint
    pub readings_ttl: Duration,
    /// Freshness window for reading explanations
    pub explanation_ttl: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: StdDuration,
    /// Where cache entries and the log file live
    pub cache_dir: PathBuf,
    /// Never call the provider
    pub offline: bool,
}

impl Settings {
    /// Default settings rooted at `cache_dir`
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            prayers_ttl: Duration::days(PRAYERS_TTL_DAYS),
            readings_ttl: Duration::days(READINGS_TTL_DAYS),
            explanation_ttl: Duration::days(EXPLANATION_TTL_DAYS),
            request_timeout: StdDuration::from_secs(REQUEST_TIMEOUT_SECS),
            cache_dir,
            offline: false,
        }
    }

    /// Resolves settings from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir().ok_or(ConfigError::NoCacheDir)?,
        };

        let mut settings = Self::with_cache_dir(cache_dir);
        settings.api_key = cli.api_key.clone().filter(|key| !key.trim().is_empty());
        settings.model = cli.model.clone();
        settings.offline = cli.offline;
        Ok(settings)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("prayers_ttl", &self.prayers_ttl)
            .field("readings_ttl", &self.readings_ttl)
            .field("explanation_ttl", &self.explanation_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("cache_dir", &self.cache_dir)
            .field("offline", &self.offline)
            .finish()
    }
}
