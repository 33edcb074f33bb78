use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::utils::paths::get_local_state_path;

pub const SEARCH_KEY: &str = "search";
pub const SORTING_KEY: &str = "sorting";
pub const WORKING_ID_KEY: &str = "working_id";
pub const WORKING_START_KEY: &str = "working_start";
pub const AUTHOR_SEARCH_KEY: &str = "authorSearch";
pub const BOOK_SEARCH_KEY: &str = "bookSearch";

/// Small string key-value storage for view state that survives restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores the value immediately (write-through).
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps everything in memory; used by tests and as a fallback.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at the default location (`~/.todo-desk/local_state.json`).
    pub fn open_default() -> Result<Self> {
        Self::open(get_local_state_path()?)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let values = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        debug!(key, "storing local state");
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}
