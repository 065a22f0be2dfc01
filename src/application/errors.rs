//! Application error taxonomy
//!
//! Validation errors are synchronous and stop a scan before it starts.
//! Analyzer and storage errors are asynchronous and observable only through
//! the stored result's status and diagnostics; nothing here is fatal to the
//! process.

use uuid::Uuid;

use crate::infrastructure::store::StorageError;

/// Request validation failure; the scan never starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("repository path must not be empty")]
    EmptyRepositoryPath,

    #[error("repository path does not exist: {0}")]
    RepositoryNotFound(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl From<crate::domain::scan::value_objects::UnsupportedLanguage> for ValidationError {
    fn from(e: crate::domain::scan::value_objects::UnsupportedLanguage) -> Self {
        ValidationError::UnsupportedLanguage(e.0)
    }
}

/// Error surfaced by the orchestrator and query service.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("scan not found: {0}")]
    NotFound(Uuid),
}

impl ScanError {
    /// Whether this error is the domain-level "unknown scan id" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
