//! Test helpers shared across the integration suites

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use sentra::config::AnalysisConfig;
use sentra::domain::analyzer::{
    Analyzer, AnalyzerContext, AnalyzerError, AnalyzerKind, AnalyzerReport,
};
use sentra::domain::scan::entities::{IndexEntry, ScanResult};
use sentra::domain::scan::value_objects::ScanStatus;
use sentra::infrastructure::store::StorageError;
use sentra::{
    AnalyzerRegistry, InMemoryResultStore, QueryService, ResultStore, ScanOrchestrator,
};

/// Orchestrator and query service wired to one shared in-memory store.
pub fn engine() -> (ScanOrchestrator, QueryService) {
    let registry = Arc::new(AnalyzerRegistry::with_defaults(&AnalysisConfig::default()));
    engine_with_registry(registry)
}

pub fn engine_with_registry(registry: Arc<AnalyzerRegistry>) -> (ScanOrchestrator, QueryService) {
    let store = Arc::new(InMemoryResultStore::new());
    let orchestrator = ScanOrchestrator::new(registry, store.clone());
    let query = QueryService::new(store);
    (orchestrator, query)
}

/// Poll until the scan reaches a terminal status, or panic after ~5s.
pub async fn wait_for_terminal(query: &QueryService, scan_id: Uuid) -> ScanResult {
    for _ in 0..100 {
        let result = query.get_scan(scan_id).await.expect("scan should exist");
        if result.status.is_terminal() {
            return result;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("scan {} never reached a terminal status", scan_id);
}

/// Store that accepts every save except the `completed` one.
///
/// Models a backend that goes bad mid-scan: the initial `in_progress` write
/// lands, the terminal write does not, and the orchestrator's failure marker
/// is allowed through so polls can observe it.
pub struct CompletedSaveFailingStore {
    inner: InMemoryResultStore,
}

impl CompletedSaveFailingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryResultStore::new(),
        }
    }
}

#[async_trait]
impl ResultStore for CompletedSaveFailingStore {
    async fn save(&self, result: &ScanResult) -> Result<(), StorageError> {
        if result.status == ScanStatus::Completed {
            return Err(StorageError::Index("injected write failure".to_string()));
        }
        self.inner.save(result).await
    }

    async fn get(&self, scan_id: Uuid) -> Result<Option<ScanResult>, StorageError> {
        self.inner.get(scan_id).await
    }

    async fn list_recent(&self) -> Result<Vec<IndexEntry>, StorageError> {
        self.inner.list_recent().await
    }
}

/// Analyzer that always fails; used to exercise degraded and failed scans.
pub struct FailingAnalyzer {
    kind: AnalyzerKind,
}

impl FailingAnalyzer {
    pub fn new(kind: AnalyzerKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Analyzer for FailingAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        self.kind
    }

    async fn run(&self, _ctx: &AnalyzerContext) -> Result<AnalyzerReport, AnalyzerError> {
        Err(AnalyzerError::ExecutionFailed(
            "injected failure for testing".to_string(),
        ))
    }
}
