//! Scan value objects

use serde::{Deserialize, Serialize};

/// Languages the analyzers know how to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Python,
    Java,
    Csharp,
    Go,
    Ruby,
    Php,
}

impl Language {
    /// All supported languages, in declaration order.
    pub const ALL: [Language; 7] = [
        Self::Javascript,
        Self::Python,
        Self::Java,
        Self::Csharp,
        Self::Go,
        Self::Ruby,
        Self::Php,
    ];

    /// Default language set applied when a request omits `languages`.
    pub fn defaults() -> Vec<Language> {
        vec![Self::Javascript, Self::Python]
    }

    /// Source file extensions associated with this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Javascript => &["js", "jsx", "ts", "tsx", "mjs", "cjs"],
            Self::Python => &["py"],
            Self::Java => &["java"],
            Self::Csharp => &["cs"],
            Self::Go => &["go"],
            Self::Ruby => &["rb"],
            Self::Php => &["php"],
        }
    }

    /// Language owning a source file extension, if any.
    pub fn from_extension(extension: &str) -> Option<Language> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.extensions().contains(&extension))
    }

    /// Dependency manifest file names for this language.
    ///
    /// `Csharp` project files (`*.csproj`) are matched by extension rather
    /// than by name; see [`Language::manifest_extensions`].
    pub fn manifest_files(&self) -> &'static [&'static str] {
        match self {
            Self::Javascript => &["package.json"],
            Self::Python => &["requirements.txt", "Pipfile", "pyproject.toml"],
            Self::Java => &["pom.xml", "build.gradle"],
            Self::Csharp => &["packages.config"],
            Self::Go => &["go.mod"],
            Self::Ruby => &["Gemfile"],
            Self::Php => &["composer.json"],
        }
    }

    /// Dependency manifest extensions for this language.
    pub fn manifest_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Csharp => &["csproj"],
            _ => &[],
        }
    }
}

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" => Ok(Self::Javascript),
            "python" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "csharp" => Ok(Self::Csharp),
            "go" => Ok(Self::Go),
            "ruby" => Ok(Self::Ruby),
            "php" => Ok(Self::Php),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Javascript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Csharp => "csharp",
            Self::Go => "go",
            Self::Ruby => "ruby",
            Self::Php => "php",
        };
        write!(f, "{}", name)
    }
}

/// Error returned when parsing a language name outside the supported set
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

/// How thorough a scan should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanDepth {
    /// Shallow walk with tight file caps
    Quick,
    /// Balanced walk suitable for most repositories
    #[default]
    Standard,
    /// Uncapped walk over the whole tree
    Deep,
}

impl ScanDepth {
    /// Maximum directory depth walked at this setting.
    pub fn max_walk_depth(&self) -> usize {
        match self {
            Self::Quick => 4,
            Self::Standard => 16,
            Self::Deep => 64,
        }
    }

    /// Cap on the number of files read, if any.
    pub fn max_files(&self) -> Option<usize> {
        match self {
            Self::Quick => Some(200),
            Self::Standard => Some(5000),
            Self::Deep => None,
        }
    }

    /// Rough completion estimate advertised in the scan acknowledgment.
    pub fn estimated_duration_secs(&self) -> i64 {
        match self {
            Self::Quick => 10,
            Self::Standard => 30,
            Self::Deep => 120,
        }
    }
}

impl std::fmt::Display for ScanDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quick => write!(f, "quick"),
            Self::Standard => write!(f, "standard"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

/// Scan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// Scan has been created but not started
    Pending,
    /// Analyzers are executing
    InProgress,
    /// Scan finished and the result is final
    Completed,
    /// Scan failed; the result carries diagnostics
    Failed,
}

impl ScanStatus {
    /// Returns the set of valid target states from the current state.
    ///
    /// ```text
    /// Pending ──► InProgress ──► Completed
    ///   │             │
    ///   └──► Failed ◄─┘
    /// ```
    pub fn valid_transitions(&self) -> &[ScanStatus] {
        match self {
            Self::Pending => &[Self::InProgress, Self::Failed],
            Self::InProgress => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `target` is allowed from the current state.
    pub fn can_transition_to(&self, target: ScanStatus) -> bool {
        self.valid_transitions().contains(&target)
    }

    /// Whether this status represents a terminal (final) state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Info => write!(f, "info"),
        }
    }
}
