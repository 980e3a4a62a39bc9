//! Durable key-value store for carousel session state.
//!
//! The persistence layer only assumes `get(key) -> Option<String>` and
//! `set(key, value)`; structured values are JSON-encoded strings. The
//! production backend is a single JSON object file in the session directory,
//! rewritten atomically on every `set`. Tests use an in-memory map.

use crate::error::{CarouselError, Result};
use crate::fs::atomic_write_file;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Minimal durable key-value interface.
///
/// Writes must be durable by the time `set` returns.
pub trait Store {
    /// Read the value for a key, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value for a key, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one JSON object of string keys to string values.
///
/// The whole map is rewritten atomically on each `set`, so the file is never
/// observed half-written. Keys are kept sorted for stable diffs.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store file, loading existing values if the file exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.is_file() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                CarouselError::User(format!(
                    "store file '{}' is corrupted: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.values)?;
        atomic_write_file(&self.path, &content)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
