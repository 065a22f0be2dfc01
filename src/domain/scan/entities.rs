//! Scan domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::analyzer::AnalyzerKind;
use crate::domain::finding::Finding;

use super::value_objects::{Language, ScanDepth, ScanStatus, Severity};

/// Request to scan a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Filesystem path of the repository to scan
    pub repository_path: String,
    /// Languages to analyze; defaults to javascript + python when omitted
    #[serde(default = "Language::defaults")]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub scan_depth: ScanDepth,
}

impl ScanRequest {
    pub fn new(repository_path: impl Into<String>) -> Self {
        Self {
            repository_path: repository_path.into(),
            languages: Language::defaults(),
            scan_depth: ScanDepth::default(),
        }
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_depth(mut self, depth: ScanDepth) -> Self {
        self.scan_depth = depth;
        self
    }
}

/// Finding counts broken down by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    /// Tally the severities of a finding set.
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            counts.record(finding.severity());
        }
        counts
    }

    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

/// Summary statistics for one scan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_files_scanned: usize,
    pub vulnerability_count: usize,
    pub severity_counts: SeverityCounts,
    /// Normalized severity-weighted aggregate in [0, 10]
    pub risk_score: f64,
}

/// Error recorded when one analyzer degrades without failing the scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerDiagnostic {
    pub analyzer: AnalyzerKind,
    pub error: String,
}

/// Full result of one orchestrated scan
///
/// Created once per scan; `status` only moves forward
/// (see [`ScanStatus::valid_transitions`]) and the record is never mutated
/// after reaching a terminal status. Owned by the result store once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_id: Uuid,
    pub repository_path: String,
    pub languages: Vec<Language>,
    pub scan_depth: ScanDepth,
    /// Merged findings from all analyzers that succeeded
    #[serde(rename = "vulnerabilities")]
    pub findings: Vec<Finding>,
    pub summary: ScanSummary,
    /// Creation instant; immutable across status transitions
    pub timestamp: DateTime<Utc>,
    pub status: ScanStatus,
    /// Errors from analyzers that degraded instead of failing the scan
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<AnalyzerDiagnostic>,
}

impl ScanResult {
    pub fn new(repository_path: String, languages: Vec<Language>, scan_depth: ScanDepth) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            repository_path,
            languages,
            scan_depth,
            findings: Vec::new(),
            summary: ScanSummary::default(),
            timestamp: Utc::now(),
            status: ScanStatus::Pending,
            diagnostics: Vec::new(),
        }
    }

    /// Apply a status transition, refusing anything the state machine forbids.
    pub fn advance(&mut self, next: ScanStatus) -> bool {
        if self.status.can_transition_to(next) {
            self.status = next;
            true
        } else {
            tracing::warn!(
                scan_id = %self.scan_id,
                from = %self.status,
                to = %next,
                "Ignoring invalid scan status transition"
            );
            false
        }
    }

    /// Projection stored in the recent-scan index.
    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            scan_id: self.scan_id,
            timestamp: self.timestamp,
            repository_path: self.repository_path.clone(),
            vulnerability_count: self.summary.vulnerability_count,
            risk_score: self.summary.risk_score,
        }
    }
}

/// Index projection of a scan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub scan_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub repository_path: String,
    pub vulnerability_count: usize,
    pub risk_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_refuses_backward_transitions() {
        let mut result =
            ScanResult::new("/tmp/repo".to_string(), Language::defaults(), ScanDepth::Standard);
        assert_eq!(result.status, ScanStatus::Pending);

        assert!(result.advance(ScanStatus::InProgress));
        assert!(result.advance(ScanStatus::Completed));
        assert!(!result.advance(ScanStatus::InProgress));
        assert!(!result.advance(ScanStatus::Failed));
        assert_eq!(result.status, ScanStatus::Completed);
    }

    #[test]
    fn index_entry_projects_summary_fields() {
        let mut result =
            ScanResult::new("/tmp/repo".to_string(), Language::defaults(), ScanDepth::Quick);
        result.summary.vulnerability_count = 3;
        result.summary.risk_score = 7.5;

        let entry = result.index_entry();
        assert_eq!(entry.scan_id, result.scan_id);
        assert_eq!(entry.timestamp, result.timestamp);
        assert_eq!(entry.vulnerability_count, 3);
        assert_eq!(entry.risk_score, 7.5);
    }
}
