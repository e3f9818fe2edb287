/// Persistent local state — an injected string-keyed store holding the
/// per-day sequence counters and per-pair pick history.
///
/// The store is deliberately dumb: get/set/remove on namespaced string
/// keys, mirroring the browser-local storage the original deployment
/// used. Callers inject it into the pipeline, so tests run against
/// `MemoryStore` and hosts that want durability use `FileStore`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialization error: {0}")]
    RonSer(#[from] ron::Error),
    #[error("RON deserialization error: {0}")]
    RonDe(#[from] ron::error::SpannedError),
}

/// The string-keyed surface the pipeline persists through.
///
/// Increments are read-then-write through this trait and are not atomic
/// across concurrent callers for the same key; `&mut self` already
/// serializes access under single ownership, and a host that shares a
/// store across threads wraps it in a `Mutex` at its own boundary.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Store key for the per-day sequence counter.
pub fn sequence_key(account_id: &str, preset_id: &str, level: &str, day: &str) -> String {
    format!("vseq|{}|{}|{}|{}", account_id, preset_id, level, day)
}

/// Store key for the last-two-picks history.
pub fn history_key(account_id: &str, preset_id: &str) -> String {
    format!("vhist|{}|{}", account_id, preset_id)
}

/// Read-then-increment the sequence counter under `key`, returning the
/// incremented value (1 on first use). Exactly one increment per call.
///
/// Storage faults degrade, per the error policy, to the value an empty
/// store would yield — the call still proceeds deterministically, it
/// just loses seed variation within the day.
pub fn next_sequence(store: &mut dyn StateStore, key: &str) -> u64 {
    let current = store
        .get(key)
        .ok()
        .flatten()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let next = current.saturating_add(1);
    let _ = store.set(key, &next.to_string());
    next
}

/// In-memory store for tests, previews, and browser sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: the whole map lives as one RON snapshot on disk,
/// loaded at open and written through on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: FxHashMap<String, String>,
}

/// On-disk shape of the snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    entries: FxHashMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`, loading the existing snapshot if present.
    pub fn open(path: impl Into<PathBuf>) -> Result<FileStore, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let snapshot: Snapshot = ron::from_str(&contents)?;
            snapshot.entries
        } else {
            FxHashMap::default()
        };
        Ok(FileStore { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            entries: self.entries.clone(),
        };
        let contents = ron::to_string(&snapshot)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
