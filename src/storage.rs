//! Local canvas storage
//!
//! Durable key/value storage of canvas states, one JSON file per key inside
//! a directory. Files are named by the SHA-256 of the key and carry the key
//! itself, so any string is a valid key. Failures never escape: `save`
//! reports a boolean and `load` returns `None` for absent or corrupt entries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{CanvasError, Result};
use crate::export::archive::hex_digest;
use crate::layers::{canvas_state_from_value, CanvasState};

/// Extension of stored canvas files.
const STORE_EXTENSION: &str = "json";

/// On-disk envelope of one stored canvas.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCanvas {
    key: String,
    state: Value,
}

/// Directory-backed canvas store.
#[derive(Debug, Clone)]
pub struct CanvasStore {
    dir: PathBuf,
}

impl CanvasStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the entry for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", hex_digest(key.as_bytes()), STORE_EXTENSION))
    }

    fn try_save(&self, key: &str, state: &CanvasState) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| CanvasError::DirectoryCreateError {
                path: self.dir.clone(),
                source: e,
            })?;
        }
        let path = self.path_for(key);
        let content = serde_json::to_string_pretty(&StoredCanvas {
            key: key.to_string(),
            state: serde_json::to_value(state)?,
        })?;
        fs::write(&path, content).map_err(|e| CanvasError::FileWriteError { path, source: e })
    }

    /// Store `state` under `key`. Returns false on any failure.
    pub fn save(&self, key: &str, state: &CanvasState) -> bool {
        match self.try_save(key, state) {
            Ok(()) => {
                debug!("Saved canvas '{}'", key);
                true
            }
            Err(e) => {
                warn!("Failed to save canvas '{}': {}", key, e);
                false
            }
        }
    }

    fn read_entry(path: &Path) -> Option<StoredCanvas> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Load the state stored under `key`, or `None` if absent or corrupt.
    pub fn load(&self, key: &str) -> Option<CanvasState> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        let state = Self::read_entry(&path)
            .filter(|entry| entry.key == key)
            .and_then(|entry| canvas_state_from_value(entry.state));
        if state.is_none() {
            warn!("Ignoring corrupt canvas at {}", path.display());
        }
        state
    }

    /// Delete the entry for `key`. Returns true if something was removed.
    pub fn remove(&self, key: &str) -> bool {
        fs::remove_file(self.path_for(key)).is_ok()
    }

    /// Keys currently stored, sorted. Unreadable files are skipped.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|ext| ext.to_str()) == Some(STORE_EXTENSION)
            })
            .filter_map(|entry| Self::read_entry(entry.path()))
            .map(|entry| entry.key)
            .collect();
        keys.sort();
        keys
    }
}
