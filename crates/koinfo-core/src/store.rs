//! Persistence for the single JSON document
//!
//! The ledger engine only ever sees a [`Store`]. Two implementations exist:
//! - [`JsonStore`] - the data file on disk, written atomically
//! - [`MemoryStore`] - an in-process copy for tests

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Dataset;

/// Default location of the data file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "data/finance_data.json";

/// Load/save the whole dataset as one unit
pub trait Store: Send + Sync {
    /// Load the dataset, initializing the backing storage if it is empty
    fn load(&self) -> Result<Dataset>;

    /// Overwrite the stored dataset
    fn save(&self, data: &Dataset) -> Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// JSON file on disk
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the seed dataset if the file does not exist yet
    ///
    /// Returns true when a new file was created.
    pub fn init(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Dataset::seeded())?;
        info!("Created data file: {}", self.path.display());
        Ok(true)
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Dataset> {
        self.init()?;
        let contents = fs::read_to_string(&self.path)?;
        let data: Dataset = serde_json::from_str(&contents)?;
        debug!(
            path = %self.path.display(),
            categories = data.categories.len(),
            transactions = data.transactions.len(),
            "Loaded dataset"
        );
        Ok(data)
    }

    fn save(&self, data: &Dataset) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), bytes = json.len(), "Saved dataset");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write to a temp file beside `path`, then rename it into place
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| {
        Error::Storage(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;
    Ok(())
}

/// Dataset held in memory (for testing)
pub struct MemoryStore {
    data: Mutex<Option<Dataset>>,
}

impl MemoryStore {
    /// Empty store; the first load yields the seed dataset
    pub fn new() -> Self {
        Self {
            data: Mutex::new(None),
        }
    }

}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Dataset> {
        let mut slot = self
            .data
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        Ok(slot.get_or_insert_with(Dataset::seeded).clone())
    }

    fn save(&self, data: &Dataset) -> Result<()> {
        let mut slot = self
            .data
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        *slot = Some(data.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
