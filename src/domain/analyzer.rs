//! Analyzer capability trait
//!
//! Every analyzer implements [`Analyzer`] so the orchestrator can fan them
//! out, merge their findings, and degrade gracefully when one of them fails.
//! The bundled analyzers are deliberately lightweight; a real static-analysis
//! engine slots in behind the same trait without touching the orchestrator,
//! the scorer, or the store.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::finding::Finding;
use super::scan::value_objects::{Language, ScanDepth};

/// Analyzer type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    /// Source-code vulnerability scanning
    Vulnerability,
    /// Dependency-vulnerability checking
    Dependency,
    /// Secret detection
    Secret,
}

impl std::fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vulnerability => write!(f, "vulnerability"),
            Self::Dependency => write!(f, "dependency"),
            Self::Secret => write!(f, "secret"),
        }
    }
}

/// Execution context handed to every analyzer
///
/// `scan_depth` only matters to the vulnerability analyzer; the dependency
/// and secret analyzers ignore it.
#[derive(Debug, Clone)]
pub struct AnalyzerContext {
    pub repository_path: PathBuf,
    pub languages: Vec<Language>,
    pub scan_depth: ScanDepth,
}

/// Outcome of one analyzer run
#[derive(Debug, Clone, Default)]
pub struct AnalyzerReport {
    pub findings: Vec<Finding>,
    /// Number of files the analyzer actually read
    pub files_scanned: usize,
    pub duration_ms: u64,
    /// Paths of note discovered during the run (dependency manifests for the
    /// dependency analyzer); empty for analyzers with nothing to report
    pub discovered_files: Vec<String>,
}

/// Error from a single analyzer
///
/// A failing analyzer never aborts its siblings; the orchestrator records the
/// error as a diagnostic on the scan result.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("analyzer execution failed: {0}")]
    ExecutionFailed(String),

    #[error("repository path does not exist: {0}")]
    MissingRepository(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pluggable analysis capability
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Identifier used for registration and diagnostics.
    fn kind(&self) -> AnalyzerKind;

    /// Run the analyzer against the repository described by `ctx`.
    async fn run(&self, ctx: &AnalyzerContext) -> Result<AnalyzerReport, AnalyzerError>;
}
