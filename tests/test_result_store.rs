//! Result store contract tests, run against both backends

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use sentra::domain::finding::{Finding, SecretFinding};
use sentra::domain::scan::entities::ScanResult;
use sentra::domain::scan::value_objects::{Language, ScanDepth, ScanStatus, Severity};
use sentra::config::StorageConfig;
use sentra::infrastructure::store::MAX_INDEX_ENTRIES;
use sentra::{FileResultStore, InMemoryResultStore, ResultStore};

fn sample_result(offset_secs: i64) -> ScanResult {
    let mut result = ScanResult::new(
        "/tmp/fixture".to_string(),
        Language::defaults(),
        ScanDepth::Standard,
    );
    result.timestamp = Utc::now() + Duration::seconds(offset_secs);
    result.advance(ScanStatus::InProgress);
    result.findings.push(Finding::Secret(SecretFinding {
        secret_type: "GitHub Token".to_string(),
        file_path: ".npmrc".to_string(),
        line_number: 2,
        masked_value: "gh********en".to_string(),
        severity: Severity::Critical,
    }));
    result.summary.vulnerability_count = 1;
    result.summary.severity_counts.critical = 1;
    result.summary.risk_score = 10.0;
    result.advance(ScanStatus::Completed);
    result
}

async fn save_then_get_roundtrips(store: &dyn ResultStore) {
    let result = sample_result(0);
    store.save(&result).await.unwrap();

    let loaded = store.get(result.scan_id).await.unwrap().expect("stored result");
    assert_eq!(loaded, result);
}

async fn unknown_id_is_absent(store: &dyn ResultStore) {
    assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
}

async fn index_caps_at_fifty_newest(store: &dyn ResultStore) {
    let total = MAX_INDEX_ENTRIES + 10;
    let mut newest_ids = Vec::new();
    for i in 0..total {
        let result = sample_result(i as i64);
        if i >= 10 {
            newest_ids.push(result.scan_id);
        }
        store.save(&result).await.unwrap();
    }

    let index = store.list_recent().await.unwrap();
    assert_eq!(index.len(), MAX_INDEX_ENTRIES);
    assert!(index.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    for entry in &index {
        assert!(newest_ids.contains(&entry.scan_id), "evicted entry survived");
    }
}

async fn resaving_upserts_index(store: &dyn ResultStore) {
    let result = sample_result(0);
    store.save(&result).await.unwrap();
    store.save(&result).await.unwrap();

    let index = store.list_recent().await.unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index[0].scan_id, result.scan_id);
    assert_eq!(index[0].vulnerability_count, 1);
    assert_eq!(index[0].risk_score, 10.0);
}

async fn concurrent_saves_lose_no_index_entries(store: Arc<dyn ResultStore>) {
    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.save(&sample_result(i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.list_recent().await.unwrap().len(), 20);
}

#[tokio::test]
async fn memory_store_roundtrips() {
    let store = InMemoryResultStore::new();
    save_then_get_roundtrips(&store).await;
    unknown_id_is_absent(&store).await;
}

#[tokio::test]
async fn memory_store_index_discipline() {
    let store = InMemoryResultStore::new();
    index_caps_at_fifty_newest(&store).await;
}

#[tokio::test]
async fn memory_store_upserts() {
    let store = InMemoryResultStore::new();
    resaving_upserts_index(&store).await;
}

#[tokio::test]
async fn memory_store_concurrent_saves() {
    concurrent_saves_lose_no_index_entries(Arc::new(InMemoryResultStore::new())).await;
}

#[tokio::test]
async fn file_store_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileResultStore::new(dir.path().to_path_buf());
    save_then_get_roundtrips(&store).await;
    unknown_id_is_absent(&store).await;
}

#[tokio::test]
async fn file_store_index_discipline() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileResultStore::new(dir.path().to_path_buf());
    index_caps_at_fifty_newest(&store).await;
}

#[tokio::test]
async fn file_store_upserts() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileResultStore::new(dir.path().to_path_buf());
    resaving_upserts_index(&store).await;
}

#[tokio::test]
async fn file_store_concurrent_saves() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(FileResultStore::new(dir.path().to_path_buf()));
    concurrent_saves_lose_no_index_entries(store).await;
}

#[tokio::test]
async fn file_store_honors_configured_index_cap() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileResultStore::from_config(&StorageConfig {
        data_dir: dir.path().to_path_buf(),
        max_index_entries: 3,
    });

    for i in 0..5 {
        store.save(&sample_result(i)).await.unwrap();
    }

    let index = store.list_recent().await.unwrap();
    assert_eq!(index.len(), 3);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result(0);
    {
        let store = FileResultStore::new(dir.path().to_path_buf());
        store.save(&result).await.unwrap();
    }

    let reopened = FileResultStore::new(dir.path().to_path_buf());
    let loaded = reopened.get(result.scan_id).await.unwrap().expect("persisted result");
    assert_eq!(loaded, result);
    assert_eq!(reopened.list_recent().await.unwrap().len(), 1);
}
