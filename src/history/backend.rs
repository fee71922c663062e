//! Key-value persistence backends for the history snapshot.
//!
//! [`FileStore`] keeps each key as `{data_dir}/{key}.json`, written
//! atomically (temp file + fsync + rename). [`MemoryStore`] keeps values in
//! process and is shared between clones.

use std::{
    collections::HashMap,
    fmt,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::error::StorageError;

/// Durable string storage addressed by a fixed key.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read the value under `key`, `None` if it was never written or was cleared.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` entirely. Deleting a missing key succeeds.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| StorageError::io(&data_dir, e))?;
        Ok(Self { data_dir })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let tmp_path = path.with_extension("json.tmp");

        let mut file =
            std::fs::File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| StorageError::io(&tmp_path, e))?;

        std::fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_atomic(&self.key_path(key), value)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

/// In-process store. Clones see the same values, so handing a clone to a
/// fresh [`HistoryStore`](super::HistoryStore) simulates a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested")).unwrap();

        assert_eq!(store.load("history").unwrap(), None);

        store.save("history", "[1,2]").unwrap();
        assert_eq!(store.load("history").unwrap().as_deref(), Some("[1,2]"));
        assert!(store.data_dir().join("history.json").exists());
        assert!(!store.data_dir().join("history.json.tmp").exists());

        store.save("history", "[]").unwrap();
        assert_eq!(store.load("history").unwrap().as_deref(), Some("[]"));

        store.clear("history").unwrap();
        assert_eq!(store.load("history").unwrap(), None);
        assert!(!store.data_dir().join("history.json").exists());
    }

    #[test]
    fn file_store_clear_of_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.clear("history").is_ok());
    }

    #[test]
    fn memory_store_clones_share_values() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.save("history", "[]").unwrap();
        assert!(clone.contains("history"));
        clone.clear("history").unwrap();
        assert_eq!(store.load("history").unwrap(), None);
    }
}
