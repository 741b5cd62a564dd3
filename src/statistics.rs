//! Per-block answer statistics that survive restarts.
//!
//! The store keeps the whole mapping in memory and writes all of it back
//! after every recorded answer. Storage failures are logged and otherwise
//! ignored so they can never hold up a quiz.

use indexmap::IndexMap;

use crate::data::{StatsRepository, StorageError};
use crate::models::{BlockStats, SelectionKey};

pub struct StatisticsStore {
    repository: Box<dyn StatsRepository>,
    entries: IndexMap<String, BlockStats>,
}

impl StatisticsStore {
    /// Read the persisted mapping, starting empty if it is absent or unreadable.
    pub fn load(repository: Box<dyn StatsRepository>) -> Self {
        let entries = match read_entries(repository.as_ref()) {
            Ok(entries) => {
                tracing::info!(blocks = entries.len(), "statistics loaded");
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read statistics, starting empty");
                IndexMap::new()
            }
        };

        Self {
            repository,
            entries,
        }
    }

    /// Stats for `key`, or zeroed counters if the block was never answered.
    pub fn get(&self, key: &SelectionKey) -> BlockStats {
        self.entries
            .get(&key.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Stats for `key` only if something was recorded for it.
    pub fn find(&self, key: &SelectionKey) -> Option<&BlockStats> {
        self.entries.get(&key.to_string())
    }

    pub fn entries(&self) -> &IndexMap<String, BlockStats> {
        &self.entries
    }

    /// Count one answer against `key` and persist the full mapping.
    pub fn record_answer(&mut self, key: &SelectionKey, question_index: usize, is_correct: bool) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .record(question_index, is_correct);

        tracing::debug!(%key, question_index, is_correct, "answer recorded");

        if let Err(e) = self.persist() {
            tracing::warn!(%key, error = %e, "could not save statistics");
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let blob = serde_json::to_string(&self.entries)?;
        self.repository.save(&blob)
    }
}

fn read_entries(repository: &dyn StatsRepository) -> Result<IndexMap<String, BlockStats>, StorageError> {
    let Some(blob) = repository.load()? else {
        return Ok(IndexMap::new());
    };

    let mut entries: IndexMap<String, BlockStats> = serde_json::from_str(&blob)?;
    for (key, stats) in entries.iter_mut() {
        if stats.repair() {
            tracing::warn!(%key, "stored statistics were inconsistent, repaired");
        }
    }
    Ok(entries)
}
