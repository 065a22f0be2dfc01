//! Finding types produced by the analyzers
//!
//! All analyzers emit findings in one tagged union so the orchestrator can
//! merge, count, and score them without knowing which analyzer produced what.

use serde::{Deserialize, Serialize};

use super::scan::value_objects::{Language, Severity};

/// One discovered issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    /// Static-analysis vulnerability in source code
    Vulnerability(VulnerabilityFinding),
    /// Declared dependency with a known vulnerable version
    Dependency(DependencyIssue),
    /// Exposed secret or credential
    Secret(SecretFinding),
}

impl Finding {
    /// Severity of the finding, regardless of variant.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Vulnerability(f) => f.severity,
            Self::Dependency(f) => f.severity,
            Self::Secret(f) => f.severity,
        }
    }

    /// File the finding was located in.
    pub fn file_path(&self) -> &str {
        match self {
            Self::Vulnerability(f) => &f.file_path,
            Self::Dependency(f) => &f.file_path,
            Self::Secret(f) => &f.file_path,
        }
    }
}

/// Vulnerability located in source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityFinding {
    /// Stable identifier (rule id + location)
    pub id: String,
    pub severity: Severity,
    pub name: String,
    pub description: String,
    pub file_path: String,
    /// 1-indexed line number
    pub line_number: u32,
    /// Offending source line, trimmed and truncated
    pub code_snippet: String,
    pub recommendation: String,
    pub cwe_id: Option<String>,
    pub references: Vec<String>,
}

/// Declared dependency with a known vulnerability
///
/// Severity is always within {critical, high, medium, low}; dependency
/// advisories carry no informational tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyIssue {
    pub name: String,
    pub version: String,
    pub language: Language,
    pub vulnerability_description: String,
    pub recommendation: String,
    pub severity: Severity,
    /// Manifest file the dependency was declared in
    pub file_path: String,
}

/// Exposed secret
///
/// The matched value is never stored verbatim; only `masked_value` survives.
/// Severity is always within {critical, high, medium, low}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretFinding {
    /// Kind of secret (rule name, e.g. "AWS Access Key")
    pub secret_type: String,
    pub file_path: String,
    /// 1-indexed line number
    pub line_number: u32,
    pub masked_value: String,
    pub severity: Severity,
}
