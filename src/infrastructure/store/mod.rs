//! Result store
//!
//! Persistence keyed by scan id plus a capped, timestamp-ordered index of
//! recent scans. The record write and the index update form one logical
//! transaction: an index failure after a successful record write still fails
//! the save so the caller can retry or flag the inconsistency.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileResultStore;
pub use memory_store::InMemoryResultStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::scan::entities::{IndexEntry, ScanResult};

/// Maximum number of entries retained in the recent-scan index.
pub const MAX_INDEX_ENTRIES: usize = 50;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("index update failed: {0}")]
    Index(String),
}

/// Scan result persistence interface
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist `result` keyed by its scan id, then upsert its index entry,
    /// re-sort the index by timestamp descending, and truncate it to
    /// [`MAX_INDEX_ENTRIES`].
    async fn save(&self, result: &ScanResult) -> Result<(), StorageError>;

    /// Fetch a stored result. Readers observe either the prior complete
    /// record or the new complete record, never a torn intermediate state.
    async fn get(&self, scan_id: Uuid) -> Result<Option<ScanResult>, StorageError>;

    /// Current index, already ordered newest-first.
    async fn list_recent(&self) -> Result<Vec<IndexEntry>, StorageError>;
}

/// Upsert `entry` into `index`, keeping it newest-first and capped.
///
/// Shared by every backend so the index discipline cannot drift between them.
pub(crate) fn apply_index_entry(index: &mut Vec<IndexEntry>, entry: IndexEntry, cap: usize) {
    index.retain(|existing| existing.scan_id != entry.scan_id);
    index.push(entry);
    index.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    index.truncate(cap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scan::entities::ScanResult;
    use crate::domain::scan::value_objects::{Language, ScanDepth};
    use chrono::{Duration, Utc};

    fn entry_at(offset_secs: i64) -> IndexEntry {
        let mut result =
            ScanResult::new("/tmp/repo".to_string(), Language::defaults(), ScanDepth::Standard);
        result.timestamp = Utc::now() + Duration::seconds(offset_secs);
        result.index_entry()
    }

    #[test]
    fn index_stays_capped_and_sorted() {
        let mut index = Vec::new();
        for i in 0..60 {
            apply_index_entry(&mut index, entry_at(i), MAX_INDEX_ENTRIES);
        }

        assert_eq!(index.len(), MAX_INDEX_ENTRIES);
        assert!(index.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn index_upserts_by_scan_id() {
        let mut index = Vec::new();
        let entry = entry_at(0);
        apply_index_entry(&mut index, entry.clone(), MAX_INDEX_ENTRIES);
        apply_index_entry(&mut index, entry, MAX_INDEX_ENTRIES);
        assert_eq!(index.len(), 1);
    }
}
