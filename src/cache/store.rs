//! Durable key-value storage for cached entries
//!
//! The controller only sees the [`KeyValueStore`] trait. [`FileStore`] persists
//! each key as one JSON file in an XDG-compliant cache directory, and
//! [`MemoryStore`] keeps everything in a map for tests and offline runs.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::ProjectDirs;
use thiserror::Error;

/// File extension used for entry files
const ENTRY_EXTENSION: &str = "json";

/// Errors raised by a key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing files failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A durable byte store keyed by string
///
/// Writes replace one entry atomically. There is no atomicity across keys.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Returns the bytes stored under `key`, or `None` if nothing is stored
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Removes the value stored under `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Stores entries as files on disk
///
/// Uses `~/.cache/missal/` on Linux. Keys are escaped into file names so that
/// two different keys never map onto the same file.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where entry files are stored
    dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        default_cache_dir().map(Self::with_dir)
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the entry files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to the entry file for the given key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), ENTRY_EXTENSION))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Removes every stored entry except the listed keys
    ///
    /// Files that are not entries (logs, temporaries) are left alone.
    /// Returns the number of entries removed.
    pub fn clear_except(&self, keep: &[&str]) -> Result<usize, StorageError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let kept: Vec<String> = keep.iter().map(|key| encode_key(key)).collect();
        let mut removed = 0;

        for dir_entry in read_dir {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if kept.iter().any(|k| k == stem) {
                continue;
            }
            fs::remove_file(&path)?;
            removed += 1;
        }

        tracing::info!(removed, dir = %self.dir.display(), "cleared cache entries");
        Ok(removed)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.ensure_dir()?;

        // Write beside the target and rename so readers never see half an entry
        let path = self.entry_path(key);
        let tmp = path.with_extension(format!("{}.tmp", ENTRY_EXTENSION));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps entries in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// XDG cache directory for the application, if one can be determined
pub fn default_cache_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "missal")?;
    Some(project_dirs.cache_dir().to_path_buf())
}

/// Escapes a key into a file stem
///
/// ASCII letters, digits, `-` and `_` pass through; every other byte becomes
/// `%XX`. Since `%` itself is escaped the mapping is injective.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}
