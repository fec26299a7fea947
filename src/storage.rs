//! Persistence of the task collection to a key-value byte store.
//!
//! The collection is stored as one JSON array under a single key. The
//! [`KvStore`] trait is the only thing the rest of the crate needs from the
//! medium; [`FileStore`] keeps one file per key in a directory and
//! [`MemoryStore`] keeps everything in memory.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::task::Task;

/// Key under which the collection is stored unless configured otherwise.
pub const DEFAULT_KEY: &str = "todos";

/// Synchronous byte store addressed by string keys.
pub trait KvStore {
    /// Fetch the bytes stored under `key`, or `None` if the key was never set.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Directory-backed store: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(bytes)?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// In-memory store, used for ephemeral sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Convert a storage key to a safe file stem.
/// Lowercases and collapses anything that is not alphanumeric into single underscores.
pub fn sanitize_key(key: &str) -> String {
    let cleaned = key
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if cleaned.is_empty() {
        DEFAULT_KEY.to_string()
    } else {
        cleaned
    }
}

/// Loads and saves the task collection under one key of a [`KvStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KvStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Persistence { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the collection, degrading to an empty one when nothing is stored
    /// or the stored value cannot be used.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable task data, starting fresh");
                Vec::new()
            }
        }
    }

    /// Load the collection, reporting why stored data could not be used.
    pub fn try_load(&self) -> Result<Vec<Task>, PersistenceError> {
        let Some(bytes) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "No stored tasks");
            return Ok(Vec::new());
        };
        let tasks: Vec<Task> = serde_json::from_slice(&bytes).map_err(PersistenceError::Decode)?;
        validate_collection(&tasks)?;
        debug!(key = %self.key, count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    /// Serialise and store the collection. Failures are not retried.
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let data = serde_json::to_vec_pretty(tasks).map_err(PersistenceError::Encode)?;
        self.store.set(&self.key, &data)?;
        debug!(key = %self.key, count = tasks.len(), bytes = data.len(), "Saved tasks");
        Ok(())
    }
}

/// Check the collection invariants a decoded value must satisfy:
/// non-empty text and pairwise distinct ids.
fn validate_collection(tasks: &[Task]) -> Result<(), PersistenceError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for t in tasks {
        if t.text.trim().is_empty() {
            return Err(PersistenceError::Invalid(format!("task {} has empty text", t.id)));
        }
        if !seen.insert(t.id) {
            return Err(PersistenceError::Invalid(format!("duplicate task id {}", t.id)));
        }
    }
    Ok(())
}
