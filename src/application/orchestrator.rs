//! Scan orchestrator
//!
//! Coordinates one scan: validates the request, generates the scan id, fans
//! the requested analyzers out as background tasks, merges what they found,
//! scores it, and hands the result to the store. The submitting caller is
//! acknowledged as soon as the work is scheduled; analyzer and storage
//! failures after that point are observable only through the stored result.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::analyzer::{AnalyzerContext, AnalyzerKind, AnalyzerReport};
use crate::domain::finding::{DependencyIssue, Finding, SecretFinding};
use crate::domain::scan::entities::{
    AnalyzerDiagnostic, ScanRequest, ScanResult, ScanSummary, SeverityCounts,
};
use crate::domain::scan::value_objects::{Language, ScanDepth, ScanStatus};
use crate::infrastructure::analyzers::AnalyzerRegistry;
use crate::infrastructure::store::ResultStore;

use super::errors::{ScanError, ValidationError};
use super::scoring::risk_score;

/// Acknowledgment returned once a scan is scheduled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanAck {
    pub scan_id: Uuid,
    pub status: ScanStatus,
    pub estimated_completion_time: DateTime<Utc>,
}

/// Synchronous result of a dependency check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyCheckReport {
    pub scan_id: Uuid,
    pub vulnerable_dependencies: Vec<DependencyIssue>,
    pub dependency_files_found: Vec<String>,
    pub summary: ScanSummary,
}

/// Synchronous result of a secret detection pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretScanReport {
    pub scan_id: Uuid,
    pub secrets_found: Vec<SecretFinding>,
    pub summary: ScanSummary,
}

/// Orchestrates analyzers, scoring, and persistence for one scan at a time
pub struct ScanOrchestrator {
    registry: Arc<AnalyzerRegistry>,
    store: Arc<dyn ResultStore>,
}

impl ScanOrchestrator {
    pub fn new(registry: Arc<AnalyzerRegistry>, store: Arc<dyn ResultStore>) -> Self {
        Self { registry, store }
    }

    /// Validate and schedule a vulnerability scan.
    ///
    /// Returns as soon as the background task is spawned; the caller polls
    /// the query service with the acknowledged scan id to observe progress.
    pub async fn start_scan(&self, request: ScanRequest) -> Result<ScanAck, ScanError> {
        let languages = validate_request(&request)?;

        let mut result =
            ScanResult::new(request.repository_path.clone(), languages, request.scan_depth);
        result.advance(ScanStatus::InProgress);
        // Persist the in-progress record so polls see the scan immediately.
        self.store.save(&result).await?;

        let ack = ScanAck {
            scan_id: result.scan_id,
            status: result.status,
            estimated_completion_time: Utc::now()
                + Duration::seconds(request.scan_depth.estimated_duration_secs()),
        };

        info!(
            scan_id = %result.scan_id,
            repository = %result.repository_path,
            depth = %result.scan_depth,
            "Scan scheduled"
        );

        let registry = self.registry.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            execute_scan(registry, store, result, &[AnalyzerKind::Vulnerability]).await;
        });

        Ok(ack)
    }

    /// Run the dependency analyzer and return its report synchronously.
    ///
    /// The result is also persisted through the regular store machinery, so
    /// it shows up under its scan id and in the recent-scan index.
    pub async fn check_dependencies(
        &self,
        repository_path: String,
        languages: Vec<Language>,
    ) -> Result<DependencyCheckReport, ScanError> {
        let request = ScanRequest::new(repository_path).with_languages(languages);
        let languages = validate_request(&request)?;

        let mut result =
            ScanResult::new(request.repository_path, languages, ScanDepth::Standard);
        result.advance(ScanStatus::InProgress);

        let report = self
            .run_single(&mut result, AnalyzerKind::Dependency)
            .await;
        self.store.save(&result).await?;

        let vulnerable_dependencies = result
            .findings
            .iter()
            .filter_map(|f| match f {
                Finding::Dependency(issue) => Some(issue.clone()),
                _ => None,
            })
            .collect();

        Ok(DependencyCheckReport {
            scan_id: result.scan_id,
            vulnerable_dependencies,
            dependency_files_found: report.map(|r| r.discovered_files).unwrap_or_default(),
            summary: result.summary,
        })
    }

    /// Run the secret analyzer and return its report synchronously.
    pub async fn detect_secrets(
        &self,
        repository_path: String,
    ) -> Result<SecretScanReport, ScanError> {
        let request =
            ScanRequest::new(repository_path).with_languages(Language::ALL.to_vec());
        let languages = validate_request(&request)?;

        let mut result =
            ScanResult::new(request.repository_path, languages, ScanDepth::Standard);
        result.advance(ScanStatus::InProgress);

        self.run_single(&mut result, AnalyzerKind::Secret).await;
        self.store.save(&result).await?;

        let secrets_found = result
            .findings
            .iter()
            .filter_map(|f| match f {
                Finding::Secret(secret) => Some(secret.clone()),
                _ => None,
            })
            .collect();

        Ok(SecretScanReport {
            scan_id: result.scan_id,
            secrets_found,
            summary: result.summary,
        })
    }

    /// Run one analyzer in-line and finalize `result` with its outcome.
    async fn run_single(
        &self,
        result: &mut ScanResult,
        kind: AnalyzerKind,
    ) -> Option<AnalyzerReport> {
        let ctx = context_for(result);
        let outcome = match self.registry.get(kind) {
            Some(analyzer) => analyzer.run(&ctx).await,
            None => {
                result.diagnostics.push(AnalyzerDiagnostic {
                    analyzer: kind,
                    error: "analyzer not registered".to_string(),
                });
                finalize(result, 0, true);
                return None;
            }
        };

        match outcome {
            Ok(report) => {
                result.findings = report.findings.clone();
                finalize(result, report.files_scanned, false);
                Some(report)
            }
            Err(e) => {
                error!(scan_id = %result.scan_id, analyzer = %kind, error = %e, "Analyzer failed");
                result.diagnostics.push(AnalyzerDiagnostic {
                    analyzer: kind,
                    error: e.to_string(),
                });
                finalize(result, 0, true);
                None
            }
        }
    }
}

/// Parse caller-supplied language names into the typed set.
///
/// Outer surfaces accept languages as strings; an unknown name is rejected
/// as a validation error rather than silently dropped.
pub fn parse_languages<S: AsRef<str>>(names: &[S]) -> Result<Vec<Language>, ValidationError> {
    names
        .iter()
        .map(|name| name.as_ref().parse::<Language>().map_err(ValidationError::from))
        .collect()
}

/// Normalize and validate a request, returning the effective language set.
fn validate_request(request: &ScanRequest) -> Result<Vec<Language>, ValidationError> {
    if request.repository_path.trim().is_empty() {
        return Err(ValidationError::EmptyRepositoryPath);
    }
    if !Path::new(&request.repository_path).exists() {
        return Err(ValidationError::RepositoryNotFound(
            request.repository_path.clone(),
        ));
    }

    // An explicitly empty set falls back to the defaults; duplicates collapse.
    let mut seen = HashSet::new();
    let languages: Vec<Language> = if request.languages.is_empty() {
        Language::defaults()
    } else {
        request
            .languages
            .iter()
            .copied()
            .filter(|l| seen.insert(*l))
            .collect()
    };
    Ok(languages)
}

fn context_for(result: &ScanResult) -> AnalyzerContext {
    AnalyzerContext {
        repository_path: PathBuf::from(&result.repository_path),
        languages: result.languages.clone(),
        scan_depth: result.scan_depth,
    }
}

/// Compute the summary and apply the terminal status transition.
///
/// A scan fails only when no analyzer produced a usable report and at least
/// one hard error occurred; degraded analyzers alongside a successful one
/// leave the scan completed.
fn finalize(result: &mut ScanResult, files_scanned: usize, all_failed: bool) {
    let counts = SeverityCounts::from_findings(&result.findings);
    let total = counts.total();
    result.summary = ScanSummary {
        total_files_scanned: files_scanned,
        vulnerability_count: result.findings.len(),
        severity_counts: counts,
        risk_score: risk_score(&counts, total),
    };

    let terminal = if all_failed && !result.diagnostics.is_empty() {
        ScanStatus::Failed
    } else {
        ScanStatus::Completed
    };
    result.advance(terminal);
}

/// Background body of a scheduled scan: fan out, fan in, score, save.
async fn execute_scan(
    registry: Arc<AnalyzerRegistry>,
    store: Arc<dyn ResultStore>,
    mut result: ScanResult,
    kinds: &[AnalyzerKind],
) {
    let ctx = context_for(&result);

    // The kind travels next to its handle so a panicked task can still be
    // attributed in the diagnostics.
    let (spawned_kinds, handles): (Vec<AnalyzerKind>, Vec<_>) = kinds
        .iter()
        .filter_map(|kind| registry.get(*kind).map(|analyzer| (*kind, analyzer)))
        .map(|(kind, analyzer)| {
            let ctx = ctx.clone();
            (kind, tokio::spawn(async move { analyzer.run(&ctx).await }))
        })
        .unzip();

    // Fan-in barrier: nothing is merged until every analyzer returned.
    let outcomes = join_all(handles).await;

    let mut findings = Vec::new();
    let mut files_scanned = 0usize;
    let mut succeeded = 0usize;

    for (kind, outcome) in spawned_kinds.into_iter().zip(outcomes) {
        match outcome {
            Ok(Ok(report)) => {
                succeeded += 1;
                files_scanned += report.files_scanned;
                findings.extend(report.findings);
            }
            Ok(Err(e)) => {
                error!(scan_id = %result.scan_id, analyzer = %kind, error = %e, "Analyzer failed");
                result.diagnostics.push(AnalyzerDiagnostic {
                    analyzer: kind,
                    error: e.to_string(),
                });
            }
            Err(join_err) => {
                error!(scan_id = %result.scan_id, analyzer = %kind, error = %join_err, "Analyzer task panicked");
                result.diagnostics.push(AnalyzerDiagnostic {
                    analyzer: kind,
                    error: join_err.to_string(),
                });
            }
        }
    }

    result.findings = findings;
    // The in-memory record stays in_progress until the terminal state is
    // durable; a completed state that never reached the store never happened.
    let mut finished = result.clone();
    finalize(&mut finished, files_scanned, succeeded == 0);

    info!(
        scan_id = %finished.scan_id,
        status = %finished.status,
        findings = finished.summary.vulnerability_count,
        risk_score = finished.summary.risk_score,
        "Scan finished"
    );

    if let Err(e) = store.save(&finished).await {
        error!(scan_id = %result.scan_id, error = %e, "Failed to persist scan result");
        // Leave a failed marker behind so polls don't hang on in_progress.
        result.advance(ScanStatus::Failed);
        result.diagnostics.push(AnalyzerDiagnostic {
            analyzer: kinds.first().copied().unwrap_or(AnalyzerKind::Vulnerability),
            error: format!("storage error: {}", e),
        });
        if let Err(retry) = store.save(&result).await {
            error!(scan_id = %result.scan_id, error = %retry, "Failed to persist failure marker");
        }
    }
}
