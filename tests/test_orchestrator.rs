//! End-to-end orchestrator tests over fixture repositories

mod common;

use std::sync::Arc;

use sentra::application::ScanError;
use sentra::config::AnalysisConfig;
use sentra::domain::analyzer::AnalyzerKind;
use sentra::domain::finding::Finding;
use sentra::domain::scan::entities::ScanRequest;
use sentra::domain::scan::value_objects::{Language, ScanDepth, ScanStatus};
use sentra::{
    AnalyzerRegistry, QueryService, ScanOrchestrator, ValidationError, parse_languages,
};

use common::fixtures::{clean_repo, path_str, risky_repo};
use common::helpers::{
    CompletedSaveFailingStore, FailingAnalyzer, engine, engine_with_registry, wait_for_terminal,
};

#[tokio::test]
async fn scan_of_risky_repo_completes_with_findings() {
    let repo = risky_repo();
    let (orchestrator, query) = engine();

    let ack = orchestrator
        .start_scan(ScanRequest::new(path_str(repo.path())))
        .await
        .unwrap();
    assert_eq!(ack.status, ScanStatus::InProgress);

    let result = wait_for_terminal(&query, ack.scan_id).await;
    assert_eq!(result.status, ScanStatus::Completed);
    assert!(!result.findings.is_empty(), "eval rule should fire");
    assert_eq!(result.summary.vulnerability_count, result.findings.len());
    assert!(result.summary.risk_score > 0.0);
    assert!(result.summary.total_files_scanned >= 1);
    assert!(result.diagnostics.is_empty());
    // Creation instant survives the status transitions untouched.
    assert!(result.timestamp <= ack.estimated_completion_time);
}

#[tokio::test]
async fn scan_of_clean_repo_completes_empty() {
    let repo = clean_repo();
    let (orchestrator, query) = engine();

    let ack = orchestrator
        .start_scan(
            ScanRequest::new(path_str(repo.path()))
                .with_languages(vec![Language::Python])
                .with_depth(ScanDepth::Quick),
        )
        .await
        .unwrap();

    let result = wait_for_terminal(&query, ack.scan_id).await;
    assert_eq!(result.status, ScanStatus::Completed);
    assert!(result.findings.is_empty());
    assert_eq!(result.summary.risk_score, 0.0);
}

#[tokio::test]
async fn empty_repository_path_is_rejected_synchronously() {
    let (orchestrator, _) = engine();
    let err = orchestrator
        .start_scan(ScanRequest::new(""))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Validation(ValidationError::EmptyRepositoryPath)
    ));
}

#[tokio::test]
async fn missing_repository_is_rejected_synchronously() {
    let (orchestrator, _) = engine();
    let err = orchestrator
        .start_scan(ScanRequest::new("/nonexistent/sentra-fixture"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Validation(ValidationError::RepositoryNotFound(_))
    ));
}

#[test]
fn unknown_language_name_is_rejected_not_dropped() {
    let parsed = parse_languages(&["javascript", "cobol"]).unwrap_err();
    assert_eq!(
        parsed,
        ValidationError::UnsupportedLanguage("cobol".to_string())
    );

    let parsed = parse_languages(&["JavaScript", "python"]).unwrap();
    assert_eq!(parsed, vec![Language::Javascript, Language::Python]);
}

#[tokio::test]
async fn concurrent_scans_get_distinct_ids() {
    let repo = clean_repo();
    let (orchestrator, query) = engine();
    let orchestrator = Arc::new(orchestrator);

    let mut acks = Vec::new();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            let path = path_str(repo.path());
            tokio::spawn(async move { orchestrator.start_scan(ScanRequest::new(path)).await })
        })
        .collect();
    for handle in handles {
        acks.push(handle.await.unwrap().unwrap());
    }

    let mut ids: Vec<_> = acks.iter().map(|a| a.scan_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8, "scan ids must be unique");

    for ack in &acks {
        wait_for_terminal(&query, ack.scan_id).await;
    }
}

#[tokio::test]
async fn scan_fails_when_every_analyzer_errors() {
    let repo = clean_repo();
    let mut registry = AnalyzerRegistry::with_defaults(&AnalysisConfig::default());
    registry.register(Arc::new(FailingAnalyzer::new(AnalyzerKind::Vulnerability)));
    let (orchestrator, query) = engine_with_registry(Arc::new(registry));

    let ack = orchestrator
        .start_scan(ScanRequest::new(path_str(repo.path())))
        .await
        .unwrap();

    let result = wait_for_terminal(&query, ack.scan_id).await;
    assert_eq!(result.status, ScanStatus::Failed);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].analyzer, AnalyzerKind::Vulnerability);
    assert!(result.findings.is_empty());
}

#[tokio::test]
async fn failed_terminal_save_is_observable_as_failed_via_polling() {
    let repo = risky_repo();
    let registry = Arc::new(AnalyzerRegistry::with_defaults(&AnalysisConfig::default()));
    let store = Arc::new(CompletedSaveFailingStore::new());
    let orchestrator = ScanOrchestrator::new(registry, store.clone());
    let query = QueryService::new(store);

    // The ack goes out before the terminal write can fail.
    let ack = orchestrator
        .start_scan(ScanRequest::new(path_str(repo.path())))
        .await
        .unwrap();
    assert_eq!(ack.status, ScanStatus::InProgress);

    let result = wait_for_terminal(&query, ack.scan_id).await;
    assert_eq!(result.status, ScanStatus::Failed);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.error.contains("storage error")),
        "the failure marker must carry a storage diagnostic"
    );
}

#[tokio::test]
async fn check_dependencies_reports_vulnerable_packages() {
    let repo = risky_repo();
    let (orchestrator, query) = engine();

    let report = orchestrator
        .check_dependencies(path_str(repo.path()), vec![Language::Javascript])
        .await
        .unwrap();

    assert_eq!(report.dependency_files_found, vec!["package.json".to_string()]);
    assert_eq!(report.vulnerable_dependencies.len(), 1);
    assert_eq!(report.vulnerable_dependencies[0].name, "lodash");
    assert!(report.summary.risk_score > 0.0);

    // The check also lands in the store under its scan id.
    let stored = query.get_scan(report.scan_id).await.unwrap();
    assert_eq!(stored.status, ScanStatus::Completed);
    assert_eq!(stored.summary.vulnerability_count, 1);
}

#[tokio::test]
async fn detect_secrets_masks_matched_values() {
    let repo = risky_repo();
    let (orchestrator, query) = engine();

    let report = orchestrator
        .detect_secrets(path_str(repo.path()))
        .await
        .unwrap();

    let aws = report
        .secrets_found
        .iter()
        .find(|s| s.secret_type == "AWS Access Key")
        .expect("planted AWS key should be found");
    assert!(!aws.masked_value.contains("IOSFODNN7EXAMPLE"));

    let stored = query.get_scan(report.scan_id).await.unwrap();
    assert!(stored.findings.iter().any(|f| matches!(f, Finding::Secret(_))));
}
