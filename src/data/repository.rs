//! Durable slot for the serialized statistics blob.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub const DEFAULT_STATS_PATH: &str = "quiz_stats.json";

/// Errors surfaced by statistics storage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single string slot, read once at startup and overwritten in full.
pub trait StatsRepository: Send {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn save(&self, blob: &str) -> Result<(), StorageError>;
}

/// Keeps the blob in a JSON file next to the working directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for JsonFileRepository {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_PATH)
    }
}

impl StatsRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        // Write beside the target and rename so readers never see half a blob.
        let temp = self.temp_path();
        fs::write(&temp, blob)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Process-local slot, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current contents of the slot.
    pub fn blob(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StatsRepository for InMemoryRepository {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_repository_round_trip() {
        let path = std::env::temp_dir().join(format!("exam-prep-stats-{}.json", std::process::id()));
        let repo = JsonFileRepository::new(&path);
        fs::remove_file(&path).ok();

        assert!(repo.load().unwrap().is_none());

        repo.save(r#"{"a":1}"#).unwrap();
        repo.save(r#"{"b":2}"#).unwrap();
        assert_eq!(repo.load().unwrap().as_deref(), Some(r#"{"b":2}"#));
        assert!(!repo.temp_path().exists());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_in_memory_clones_share_slot() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();

        repo.save("x").unwrap();
        assert_eq!(other.load().unwrap().as_deref(), Some("x"));
        assert_eq!(other.blob().as_deref(), Some("x"));
    }
}
