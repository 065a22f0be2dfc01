//! Dependency-vulnerability analyzer
//!
//! Discovers per-language dependency manifests, extracts directly declared
//! dependencies, and checks them against a built-in advisory table. The table
//! is a stand-in for a real advisory feed; the analyzer contract stays the
//! same when one is wired in.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::config::AnalysisConfig;
use crate::domain::analyzer::{
    Analyzer, AnalyzerContext, AnalyzerError, AnalyzerKind, AnalyzerReport,
};
use crate::domain::finding::{DependencyIssue, Finding};
use crate::domain::scan::value_objects::{Language, Severity};
use crate::infrastructure::walker::DirectoryScanner;

use super::vulnerability::relative_path;

/// One entry in the built-in advisory table
struct Advisory {
    language: Language,
    /// Package name; matched case-insensitively
    name: &'static str,
    /// Versions strictly below this are affected
    fixed_in: &'static str,
    severity: Severity,
    description: &'static str,
}

const ADVISORIES: &[Advisory] = &[
    Advisory {
        language: Language::Javascript,
        name: "lodash",
        fixed_in: "4.17.21",
        severity: Severity::High,
        description: "Prototype pollution via zipObjectDeep and command injection via template (CVE-2021-23337).",
    },
    Advisory {
        language: Language::Javascript,
        name: "minimist",
        fixed_in: "1.2.6",
        severity: Severity::Critical,
        description: "Prototype pollution allows overriding Object prototype properties (CVE-2021-44906).",
    },
    Advisory {
        language: Language::Javascript,
        name: "axios",
        fixed_in: "0.21.2",
        severity: Severity::Medium,
        description: "Server-side request forgery via redirect handling (CVE-2021-3749).",
    },
    Advisory {
        language: Language::Javascript,
        name: "node-fetch",
        fixed_in: "2.6.7",
        severity: Severity::High,
        description: "Exposure of sensitive headers to an attacker-controlled redirect target (CVE-2022-0235).",
    },
    Advisory {
        language: Language::Python,
        name: "pyyaml",
        fixed_in: "5.4",
        severity: Severity::Critical,
        description: "yaml.load with the default loader executes arbitrary Python objects (CVE-2020-14343).",
    },
    Advisory {
        language: Language::Python,
        name: "django",
        fixed_in: "3.2.18",
        severity: Severity::High,
        description: "Potential denial of service via multipart parsing of crafted uploads (CVE-2023-24580).",
    },
    Advisory {
        language: Language::Python,
        name: "requests",
        fixed_in: "2.31.0",
        severity: Severity::Medium,
        description: "Proxy-Authorization header leaked to destination server over redirects (CVE-2023-32681).",
    },
    Advisory {
        language: Language::Java,
        name: "log4j-core",
        fixed_in: "2.17.1",
        severity: Severity::Critical,
        description: "Remote code execution via JNDI lookup in log messages, Log4Shell (CVE-2021-44228).",
    },
    Advisory {
        language: Language::Java,
        name: "jackson-databind",
        fixed_in: "2.13.4",
        severity: Severity::High,
        description: "Deep wrapper array nesting leads to resource exhaustion (CVE-2022-42003).",
    },
    Advisory {
        language: Language::Csharp,
        name: "Newtonsoft.Json",
        fixed_in: "13.0.1",
        severity: Severity::High,
        description: "Stack overflow processing deeply nested JSON causes denial of service.",
    },
    Advisory {
        language: Language::Go,
        name: "golang.org/x/text",
        fixed_in: "0.3.8",
        severity: Severity::High,
        description: "Parsing a crafted BCP 47 tag panics the process (CVE-2022-32149).",
    },
    Advisory {
        language: Language::Ruby,
        name: "nokogiri",
        fixed_in: "1.13.9",
        severity: Severity::High,
        description: "Bundled libxml2 vulnerable to multiple memory-safety issues (CVE-2022-2309).",
    },
    Advisory {
        language: Language::Ruby,
        name: "rails",
        fixed_in: "6.1.7",
        severity: Severity::High,
        description: "Possible XSS via sanitize helper with crafted allowed tags (CVE-2022-32209).",
    },
    Advisory {
        language: Language::Php,
        name: "guzzlehttp/guzzle",
        fixed_in: "7.4.5",
        severity: Severity::High,
        description: "Cross-domain cookie leakage and Authorization header forwarding on redirect (CVE-2022-31091).",
    },
];

/// Manifest-driven dependency analyzer
pub struct DependencyAnalyzer {
    max_file_size: u64,
    exclude_dirs: Vec<String>,
}

impl DependencyAnalyzer {
    pub fn new() -> Self {
        Self::with_config(&AnalysisConfig::default())
    }

    pub fn with_config(config: &AnalysisConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            exclude_dirs: config.excluded_dirs.clone(),
        }
    }
}

impl Default for DependencyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for DependencyAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Dependency
    }

    #[instrument(skip(self, ctx), fields(repository = %ctx.repository_path.display()))]
    async fn run(&self, ctx: &AnalyzerContext) -> Result<AnalyzerReport, AnalyzerError> {
        let started = Instant::now();
        let root = &ctx.repository_path;
        if !root.exists() {
            return Err(AnalyzerError::MissingRepository(
                root.display().to_string(),
            ));
        }

        let walker = DirectoryScanner::new(16, self.max_file_size)
            .with_exclude_dirs(self.exclude_dirs.clone());
        let files = walker.scan(root)?;

        let mut findings = Vec::new();
        let mut discovered_files = Vec::new();
        let mut files_scanned = 0usize;

        for file in &files {
            let Some(language) = manifest_language(&file.path, &ctx.languages) else {
                continue;
            };
            let Ok(contents) = tokio::fs::read_to_string(&file.path).await else {
                continue;
            };
            files_scanned += 1;
            let rel_path = relative_path(root, &file.path);
            discovered_files.push(rel_path.clone());

            for (name, version) in parse_manifest(&file.path, &contents) {
                if let Some(advisory) = lookup_advisory(language, &name, &version) {
                    findings.push(Finding::Dependency(DependencyIssue {
                        name,
                        version,
                        language,
                        vulnerability_description: advisory.description.to_string(),
                        recommendation: format!(
                            "Upgrade {} to {} or later.",
                            advisory.name, advisory.fixed_in
                        ),
                        severity: advisory.severity,
                        file_path: rel_path.clone(),
                    }));
                }
            }
        }

        debug!(
            manifests = discovered_files.len(),
            findings = findings.len(),
            "Dependency analysis finished"
        );

        Ok(AnalyzerReport {
            findings,
            files_scanned,
            duration_ms: started.elapsed().as_millis() as u64,
            discovered_files,
        })
    }
}

/// Match a path against the manifest names/extensions of the requested languages.
fn manifest_language(path: &Path, languages: &[Language]) -> Option<Language> {
    let name = path.file_name()?.to_str()?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    languages
        .iter()
        .copied()
        .find(|l| l.manifest_files().contains(&name) || l.manifest_extensions().contains(&ext))
}

fn lookup_advisory(language: Language, name: &str, version: &str) -> Option<&'static Advisory> {
    ADVISORIES.iter().find(|a| {
        a.language == language
            && a.name.eq_ignore_ascii_case(name)
            && version_below(version, a.fixed_in)
    })
}

/// Numeric component-wise comparison; true when `version < bound`.
///
/// Tolerates `^`, `~`, `>=`, `v` prefixes by stripping them; anything that
/// still fails to parse is treated as not comparable (not vulnerable).
fn version_below(version: &str, bound: &str) -> bool {
    let Some(version) = parse_components(version) else {
        return false;
    };
    let Some(bound) = parse_components(bound) else {
        return false;
    };

    for i in 0..version.len().max(bound.len()) {
        let v = version.get(i).copied().unwrap_or(0);
        let b = bound.get(i).copied().unwrap_or(0);
        if v != b {
            return v < b;
        }
    }
    false
}

fn parse_components(version: &str) -> Option<Vec<u64>> {
    let cleaned = version
        .trim()
        .trim_start_matches(['^', '~', '=', '>', '<', 'v', ' ']);
    let numeric: String = cleaned
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() {
        return None;
    }
    numeric
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>().ok())
        .collect()
}

/// Extract `(name, version)` pairs from a manifest, dispatching on file name.
fn parse_manifest(path: &Path, contents: &str) -> Vec<(String, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match (name, ext) {
        ("package.json", _) | ("composer.json", _) => parse_json_dependencies(contents),
        ("requirements.txt", _) => parse_requirements(contents),
        ("Pipfile", _) | ("pyproject.toml", _) => parse_python_toml(contents),
        ("go.mod", _) => parse_go_mod(contents),
        ("Gemfile", _) => parse_gemfile(contents),
        ("pom.xml", _) => parse_pom(contents),
        ("build.gradle", _) => parse_gradle(contents),
        ("packages.config", _) => parse_packages_config(contents),
        (_, "csproj") => parse_csproj(contents),
        _ => Vec::new(),
    }
}

fn parse_json_dependencies(contents: &str) -> Vec<(String, String)> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(contents) else {
        return Vec::new();
    };
    let mut deps = Vec::new();
    for section in ["dependencies", "devDependencies", "require", "require-dev"] {
        if let Some(map) = value.get(section).and_then(|v| v.as_object()) {
            for (name, version) in map {
                if let Some(version) = version.as_str() {
                    deps.push((name.clone(), version.to_string()));
                }
            }
        }
    }
    deps
}

fn parse_requirements(contents: &str) -> Vec<(String, String)> {
    static LINE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\s*([A-Za-z0-9_.\-]+)\s*(?:==|>=|~=)\s*([0-9][A-Za-z0-9_.\-]*)").unwrap()
    });
    contents
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .filter_map(|l| {
            let caps = LINE.captures(l)?;
            Some((caps[1].to_string(), caps[2].to_string()))
        })
        .collect()
}

fn parse_python_toml(contents: &str) -> Vec<(String, String)> {
    // Covers Pipfile `name = "==1.2"` entries and pyproject dependency
    // strings like "django==3.2.1" without a full TOML parse.
    static ASSIGN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?m)^\s*([A-Za-z0-9_.\-]+)\s*=\s*"(?:==|>=|~=)?\s*([0-9][A-Za-z0-9_.\-]*)""#)
            .unwrap()
    });
    static SPEC: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#""([A-Za-z0-9_.\-]+)\s*(?:==|>=|~=)\s*([0-9][A-Za-z0-9_.\-]*)""#).unwrap()
    });
    let mut deps: Vec<(String, String)> = ASSIGN
        .captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect();
    deps.extend(
        SPEC.captures_iter(contents)
            .map(|c| (c[1].to_string(), c[2].to_string())),
    );
    deps
}

fn parse_go_mod(contents: &str) -> Vec<(String, String)> {
    static REQUIRE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?m)^\s*(?:require\s+)?([A-Za-z0-9_.\-/]+\.[A-Za-z0-9_.\-/]+)\s+v([0-9][A-Za-z0-9_.\-+]*)")
            .unwrap()
    });
    REQUIRE
        .captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn parse_gemfile(contents: &str) -> Vec<(String, String)> {
    static GEM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?m)^\s*gem\s+['"]([A-Za-z0-9_.\-]+)['"]\s*,\s*['"][~><=\s]*([0-9][A-Za-z0-9_.\-]*)['"]"#)
            .unwrap()
    });
    GEM.captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn parse_pom(contents: &str) -> Vec<(String, String)> {
    static DEP: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?s)<artifactId>\s*([^<\s]+)\s*</artifactId>\s*<version>\s*([^<\s]+)\s*</version>")
            .unwrap()
    });
    DEP.captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn parse_gradle(contents: &str) -> Vec<(String, String)> {
    static COORD: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"['"][A-Za-z0-9_.\-]+:([A-Za-z0-9_.\-]+):([0-9][A-Za-z0-9_.\-]*)['"]"#)
            .unwrap()
    });
    COORD
        .captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn parse_packages_config(contents: &str) -> Vec<(String, String)> {
    static PKG: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"<package\s+id="([^"]+)"\s+version="([^"]+)""#).unwrap()
    });
    PKG.captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn parse_csproj(contents: &str) -> Vec<(String, String)> {
    static REFERENCE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"<PackageReference\s+Include="([^"]+)"\s+Version="([^"]+)""#).unwrap()
    });
    REFERENCE
        .captures_iter(contents)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}
