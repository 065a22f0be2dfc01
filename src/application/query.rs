//! Read-only access to stored scan results

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use crate::config::CacheConfig;
use crate::domain::scan::entities::{IndexEntry, ScanResult};
use crate::infrastructure::store::ResultStore;

use super::errors::ScanError;

/// Query service over the result store
///
/// Terminal results are immutable, so they are held in an injected,
/// bounded-TTL cache; in-flight results always go to the store.
pub struct QueryService {
    store: Arc<dyn ResultStore>,
    cache: Cache<Uuid, Arc<ScanResult>>,
}

impl QueryService {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self::with_cache_config(store, &CacheConfig::default())
    }

    pub fn with_cache_config(store: Arc<dyn ResultStore>, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .build();
        Self { store, cache }
    }

    /// Fetch a stored result by scan id.
    pub async fn get_scan(&self, scan_id: Uuid) -> Result<ScanResult, ScanError> {
        if let Some(hit) = self.cache.get(&scan_id).await {
            debug!(scan_id = %scan_id, "Scan result served from cache");
            return Ok((*hit).clone());
        }

        match self.store.get(scan_id).await? {
            Some(result) => {
                if result.status.is_terminal() {
                    self.cache.insert(scan_id, Arc::new(result.clone())).await;
                }
                Ok(result)
            }
            None => Err(ScanError::NotFound(scan_id)),
        }
    }

    /// Recent-scan index, newest first.
    pub async fn list_recent_scans(&self) -> Result<Vec<IndexEntry>, ScanError> {
        Ok(self.store.list_recent().await?)
    }
}
