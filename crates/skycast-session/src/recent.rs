//! Most-recent-first list of looked-up city names, persisted as a JSON array.

use std::sync::Arc;

use skycast_core::{KeyValueStore, StorageError};

/// Storage key of the persisted list
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Longest the list may grow
pub const MAX_RECENT: usize = 5;

/// Recent searches, unique (case-sensitive) and capped at [`MAX_RECENT`].
pub struct RecentSearches {
    entries: Vec<String>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearches")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl RecentSearches {
    /// Read the persisted list. A missing, unreadable or malformed record
    /// gives an empty list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(names) => normalize(names),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed recent searches record");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read recent searches");
                Vec::new()
            }
        };

        tracing::debug!(count = entries.len(), "Loaded recent searches");
        Self { entries, store }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entry by position, 0 being the most recent
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Move `name` to the front, dropping any earlier occurrence and the
    /// oldest entry past the cap, then persist.
    ///
    /// The list is written even when `name` is already at the front, so a
    /// record left stale by an earlier failed write is repaired. The
    /// in-memory list is updated even when persisting fails.
    pub fn record(&mut self, name: &str) -> Result<(), StorageError> {
        if name.trim().is_empty() {
            return Ok(());
        }

        if self.entries.first().map(String::as_str) != Some(name) {
            self.entries.retain(|existing| existing != name);
            self.entries.insert(0, name.to_string());
            self.entries.truncate(MAX_RECENT);
        }

        self.persist()
    }

    /// Empty the list and delete the persisted record
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.store.remove(RECENT_SEARCHES_KEY)
    }

    fn persist(&self) -> Result<(), StorageError> {
        // Serializing a Vec<String> cannot fail
        let json = serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string());
        self.store.set(RECENT_SEARCHES_KEY, &json)
    }
}

/// Enforce the list invariants on data read back from storage
fn normalize(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_RECENT);
    for name in names {
        if out.len() == MAX_RECENT {
            break;
        }
        if name.trim().is_empty() || out.contains(&name) {
            continue;
        }
        out.push(name);
    }
    out
}
