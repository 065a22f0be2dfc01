//! In-memory result store
//!
//! Keeps records in a `RwLock<HashMap>` and the index behind its own mutex.
//! Used for embedding and tests; behaves identically to the file backend
//! with respect to index capping and upserts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::scan::entities::{IndexEntry, ScanResult};

use super::{MAX_INDEX_ENTRIES, ResultStore, StorageError, apply_index_entry};

/// Memory-backed [`ResultStore`]
pub struct InMemoryResultStore {
    records: RwLock<HashMap<Uuid, ScanResult>>,
    index: Mutex<Vec<IndexEntry>>,
    max_index_entries: usize,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::with_index_cap(MAX_INDEX_ENTRIES)
    }

    pub fn with_index_cap(max_index_entries: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            index: Mutex::new(Vec::new()),
            max_index_entries,
        }
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, result: &ScanResult) -> Result<(), StorageError> {
        self.records
            .write()
            .await
            .insert(result.scan_id, result.clone());

        let mut index = self.index.lock().await;
        apply_index_entry(&mut index, result.index_entry(), self.max_index_entries);
        Ok(())
    }

    async fn get(&self, scan_id: Uuid) -> Result<Option<ScanResult>, StorageError> {
        Ok(self.records.read().await.get(&scan_id).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<IndexEntry>, StorageError> {
        Ok(self.index.lock().await.clone())
    }
}
