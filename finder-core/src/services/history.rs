use crate::models::history::HistoryEntry;
use crate::models::query::SearchQuery;
use crate::models::storage::{SharedStorage, StorageError};
use crate::utils::time::now_millis;
use tracing::{info, warn};

/// Maximum number of remembered searches.
pub const HISTORY_LIMIT: usize = 5;

/// Recent searches, most recent first, unique by (text, type), written through
/// to storage on every change.
pub struct HistoryStore {
    storage: SharedStorage,
    key: String,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Reads the persisted list. Missing or unreadable data starts an empty
    /// history instead of failing.
    pub async fn load(storage: SharedStorage, key: impl Into<String>) -> Self {
        let key = key.into();

        let entries = match storage.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => normalize(entries),
                Err(e) => {
                    warn!("Ignoring unparsable search history under '{}': {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read search history under '{}': {}", key, e);
                Vec::new()
            }
        };

        info!("Loaded {} search history entries", entries.len());
        Self { storage, key, entries }
    }

    pub async fn record(&mut self, query: SearchQuery) -> Result<(), StorageError> {
        self.record_at(query, now_millis()).await
    }

    /// Moves `query` to the front with a fresh timestamp, evicting the oldest
    /// entry past the limit.
    pub async fn record_at(
        &mut self,
        query: SearchQuery,
        timestamp: i64,
    ) -> Result<(), StorageError> {
        self.entries.retain(|entry| !entry.is_same_search(&query));
        self.entries.insert(0, HistoryEntry::new(query, timestamp));
        self.entries.truncate(HISTORY_LIMIT);
        self.persist().await
    }

    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.storage.remove(&self.key).await
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let value = serde_json::to_string(&self.entries)?;
        self.storage.set(&self.key, &value).await
    }
}

// Persisted data may have been written by another client; keep the
// invariants regardless of what was stored.
fn normalize(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut normalized: Vec<HistoryEntry> = Vec::with_capacity(HISTORY_LIMIT);
    for entry in entries {
        if entry.query.text().trim().is_empty() {
            continue;
        }
        if normalized.iter().any(|kept| kept.query == entry.query) {
            continue;
        }
        normalized.push(entry);
        if normalized.len() == HISTORY_LIMIT {
            break;
        }
    }
    normalized
}
