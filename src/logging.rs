//! File logging
//!
//! The terminal belongs to the TUI, so log lines go to `missal.log` in the
//! cache directory. The filter comes from `MISSAL_LOG` (same syntax as
//! `RUST_LOG`) and defaults to `warn`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log file name inside the cache directory
pub const LOG_FILE_NAME: &str = "missal.log";

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "MISSAL_LOG";

const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not open log file: {0}")]
    Io(#[from] io::Error),

    #[error("A global logger is already installed")]
    AlreadyInitialized,
}

/// Builds the filter from `MISSAL_LOG`, falling back to `warn`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens (creating if needed) the log file under `dir` in append mode
fn open_log_file(dir: &Path) -> Result<(fs::File, PathBuf), LoggingError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Installs the global subscriber writing to `dir/missal.log`
///
/// Returns the log file path.
pub fn init(dir: &Path) -> Result<PathBuf, LoggingError> {
    let (file, path) = open_log_file(dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("logs");

        let (_file, path) = open_log_file(&dir).unwrap();

        assert_eq!(path, dir.join(LOG_FILE_NAME));
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        use std::io::Write;

        let temp = TempDir::new().unwrap();
        let (mut first, path) = open_log_file(temp.path()).unwrap();
        writeln!(first, "first").unwrap();
        drop(first);

        let (mut second, _) = open_log_file(temp.path()).unwrap();
        writeln!(second, "second").unwrap();
        drop(second);

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
