//! Domain layer - core business logic and entities
//!
//! Contains the entities, value objects, and capability traits that represent
//! the business logic of scan orchestration and risk reporting.

pub mod analyzer;
pub mod finding;
pub mod scan;

pub use analyzer::{Analyzer, AnalyzerContext, AnalyzerError, AnalyzerKind, AnalyzerReport};
pub use finding::{DependencyIssue, Finding, SecretFinding, VulnerabilityFinding};
pub use scan::entities::{
    AnalyzerDiagnostic, IndexEntry, ScanRequest, ScanResult, ScanSummary, SeverityCounts,
};
pub use scan::value_objects::{Language, ScanDepth, ScanStatus, Severity, UnsupportedLanguage};
