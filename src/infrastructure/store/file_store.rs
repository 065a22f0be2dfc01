//! Filesystem-backed result store
//!
//! One JSON record per scan under `results/`, plus `index.json` for the
//! recent-scan index. Every write lands in a temp file first and is renamed
//! into place, so readers never observe a partially written record. All index
//! mutation serializes through one mutex; record writes are keyed by scan id
//! and need no shared lock.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::domain::scan::entities::{IndexEntry, ScanResult};

use super::{MAX_INDEX_ENTRIES, ResultStore, StorageError, apply_index_entry};

/// File-backed [`ResultStore`]
pub struct FileResultStore {
    data_dir: PathBuf,
    max_index_entries: usize,
    // Serializes the read-modify-write cycle on index.json. Two scans
    // completing concurrently would otherwise race and lose an update.
    index_lock: Mutex<()>,
}

impl FileResultStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_index_cap(data_dir, MAX_INDEX_ENTRIES)
    }

    pub fn with_index_cap(data_dir: impl Into<PathBuf>, max_index_entries: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_index_entries,
            index_lock: Mutex::new(()),
        }
    }

    /// Build a store from the configured directory and index cap.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::with_index_cap(config.data_dir.clone(), config.max_index_entries)
    }

    fn results_dir(&self) -> PathBuf {
        self.data_dir.join("results")
    }

    fn record_path(&self, scan_id: Uuid) -> PathBuf {
        self.results_dir().join(format!("{}.json", scan_id))
    }

    fn index_path(&self) -> PathBuf {
        self.data_dir.join("index.json")
    }

    /// Write `bytes` to `path` atomically: temp file in the same directory,
    /// then rename over the destination.
    async fn write_atomic(path: &PathBuf, bytes: &[u8]) -> Result<(), StorageError> {
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_index(&self) -> Result<Vec<IndexEntry>, StorageError> {
        match tokio::fs::read(self.index_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ResultStore for FileResultStore {
    async fn save(&self, result: &ScanResult) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(self.results_dir()).await?;

        let record = serde_json::to_vec_pretty(result)?;
        Self::write_atomic(&self.record_path(result.scan_id), &record).await?;

        // Index update is part of the same logical transaction; failing here
        // fails the whole save even though the record already landed.
        let _guard = self.index_lock.lock().await;
        let mut index = self.read_index().await?;
        apply_index_entry(&mut index, result.index_entry(), self.max_index_entries);
        let encoded = serde_json::to_vec_pretty(&index)?;
        Self::write_atomic(&self.index_path(), &encoded)
            .await
            .map_err(|e| StorageError::Index(e.to_string()))?;

        tracing::debug!(
            scan_id = %result.scan_id,
            status = %result.status,
            "Scan result persisted"
        );
        Ok(())
    }

    async fn get(&self, scan_id: Uuid) -> Result<Option<ScanResult>, StorageError> {
        match tokio::fs::read(self.record_path(scan_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_recent(&self) -> Result<Vec<IndexEntry>, StorageError> {
        self.read_index().await
    }
}
