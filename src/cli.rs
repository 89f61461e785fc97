//! Command-line interface parsing for the missal CLI
//!
//! Handles the start-up view, cache maintenance flags and provider settings.
//! Provider settings can also come from the environment.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::app::View;
use crate::data::gemini::DEFAULT_MODEL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified view name is not recognized
    #[error("Invalid view: '{0}'. Valid views: prayers, readings, rosary, saints")]
    InvalidView(String),
}

/// missal - Catholic prayers and daily Mass readings in your terminal
#[derive(Parser, Debug)]
#[command(name = "missal")]
#[command(about = "Catholic prayers and daily Mass readings in your terminal")]
#[command(version)]
pub struct Cli {
    /// View to open at start-up
    ///
    /// Valid views: prayers, readings, rosary, saints
    #[arg(long, value_name = "VIEW")]
    pub view: Option<String>,

    /// Ignore cached content and fetch everything again
    #[arg(long)]
    pub refresh: bool,

    /// Never call the AI provider; show bundled content only
    #[arg(long)]
    pub offline: bool,

    /// Directory for cached content and the log file
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Remove cached content (favorites are kept), then exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "MISSAL_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// View shown first
    pub initial_view: View,
    /// Whether the first load bypasses the cache
    pub force_refresh: bool,
}

/// Parses a view string argument into a View.
///
/// # Returns
/// * `Ok(View)` if the string names a view
/// * `Err(CliError::InvalidView)` otherwise
pub fn parse_view_arg(s: &str) -> Result<View, CliError> {
    View::parse(s).ok_or_else(|| CliError::InvalidView(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_view = match &cli.view {
            Some(view) => parse_view_arg(view)?,
            None => View::default(),
        };

        Ok(StartupConfig {
            initial_view,
            force_refresh: cli.refresh,
        })
    }
}
