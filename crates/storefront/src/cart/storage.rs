//! Key-value persistence for the cart.
//!
//! The cart is stored as one serialized value under a fixed key. Backends are
//! synchronous so a mutation can flush before it returns.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The key cannot be mapped to a storage location.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The cart could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the write.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store.
pub trait CartStorage {
    /// Read the value under `key`. `Ok(None)` means nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. to simulate a previous session.
    #[must_use]
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Current raw value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// One JSON file per key under a directory.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so a crash mid-write leaves either the old or the new payload
/// on disk. A failed write leaves no temp file behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or could escape the directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        // The temp file is removed on drop if any step below fails
        let mut file = NamedTempFile::new_in(&self.dir).map_err(io_error(&self.dir))?;
        let tmp = file.path().to_path_buf();
        file.write_all(value.as_bytes()).map_err(io_error(&tmp))?;
        file.as_file().sync_all().map_err(io_error(&tmp))?;
        file.persist(&path).map_err(|e| StorageError::Io {
            path,
            source: e.error,
        })?;

        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}
