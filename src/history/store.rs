//! History store with write-through persistence

use tracing::{debug, info, warn};

use super::{backend::KeyValueStore, entry::HistoryEntry};
use crate::error::StorageError;

/// Storage key holding the serialized history
pub const HISTORY_KEY: &str = "history";

/// Ordered, append-only log of completed countdowns.
///
/// The in-memory sequence and the persisted snapshot are brought back in
/// sync after every mutation by writing the whole sequence.
#[derive(Debug)]
pub struct HistoryStore {
    backend: Box<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    /// Set while the persisted snapshot could not be read; writes must
    /// merge it back in before replacing it.
    unread: bool,
}

impl HistoryStore {
    /// Open the store and load whatever snapshot the backend holds
    pub fn open(backend: impl KeyValueStore + 'static) -> Self {
        let backend: Box<dyn KeyValueStore> = Box::new(backend);
        let (entries, unread) = match read_snapshot(backend.as_ref()) {
            Ok(entries) => (entries, false),
            Err(e) => {
                warn!("Failed to read history snapshot, starting empty: {}", e);
                (Vec::new(), true)
            }
        };
        info!("Loaded {} history entries", entries.len());
        Self {
            backend,
            entries,
            unread,
        }
    }

    /// Re-read the persisted snapshot, replacing the in-memory sequence.
    ///
    /// If the backend cannot be read the in-memory sequence is kept as is.
    pub fn load(&mut self) -> Vec<HistoryEntry> {
        match read_snapshot(self.backend.as_ref()) {
            Ok(entries) => {
                self.entries = entries;
                self.unread = false;
            }
            Err(e) => warn!(
                "Failed to reload history snapshot, keeping {} entries: {}",
                self.entries.len(),
                e
            ),
        }
        self.entries.clone()
    }

    /// Append a record and write the full snapshot back.
    ///
    /// The entry stays in memory even if the write fails; the next
    /// successful write carries it.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), StorageError> {
        debug!("Appending history entry: task={:?}, started_at={}", entry.task, entry.started_at);
        self.entries.push(entry);
        self.recover_unread()?;
        self.persist()
    }

    /// Remove every record and delete the persisted key
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.clear(HISTORY_KEY)?;
        let removed = self.entries.len();
        self.entries.clear();
        self.unread = false;
        info!("Cleared {} history entries", removed);
        Ok(())
    }

    /// Copy of the current sequence, in append order
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put the persisted entries we never managed to read in front of the
    /// ones recorded since, so a write cannot drop them.
    fn recover_unread(&mut self) -> Result<(), StorageError> {
        if !self.unread {
            return Ok(());
        }
        let mut persisted = read_snapshot(self.backend.as_ref())?;
        info!("Recovered {} unread history entries", persisted.len());
        persisted.append(&mut self.entries);
        self.entries = persisted;
        self.unread = false;
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        self.backend.save(HISTORY_KEY, &json)
    }
}

/// Missing and corrupt snapshots mean "no history"; backend failures are returned.
fn read_snapshot(backend: &dyn KeyValueStore) -> Result<Vec<HistoryEntry>, StorageError> {
    match backend.load(HISTORY_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring corrupt history snapshot: {}", e);
            Vec::new()
        })),
        None => Ok(Vec::new()),
    }
}
