//! Pattern-based vulnerability analyzer

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::config::AnalysisConfig;
use crate::domain::analyzer::{
    Analyzer, AnalyzerContext, AnalyzerError, AnalyzerKind, AnalyzerReport,
};
use crate::domain::finding::{Finding, VulnerabilityFinding};
use crate::domain::scan::value_objects::Language;
use crate::infrastructure::walker::DirectoryScanner;

use super::vulnerability_rules::{VulnerabilityRule, default_rules};

const MAX_SNIPPET_LEN: usize = 160;

struct CompiledRule {
    regex: Regex,
    rule: &'static VulnerabilityRule,
}

/// Regex-rule vulnerability analyzer
pub struct VulnerabilityAnalyzer {
    rules: Vec<CompiledRule>,
    max_file_size: u64,
    exclude_dirs: Vec<String>,
}

impl VulnerabilityAnalyzer {
    pub fn new() -> Self {
        Self::with_config(&AnalysisConfig::default())
    }

    pub fn with_config(config: &AnalysisConfig) -> Self {
        let rules = default_rules()
            .iter()
            .filter_map(|rule| match Regex::new(rule.pattern) {
                Ok(regex) => Some(CompiledRule { regex, rule }),
                Err(e) => {
                    warn!(rule_id = rule.id, error = %e, "Failed to compile vulnerability rule");
                    None
                }
            })
            .collect();

        Self {
            rules,
            max_file_size: config.max_file_size_bytes,
            exclude_dirs: config.excluded_dirs.clone(),
        }
    }

    fn scan_line(
        &self,
        language: Option<Language>,
        file_path: &str,
        line_number: u32,
        line: &str,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        for compiled in &self.rules {
            // Rules are gated on the language of the file at hand, not the
            // requested set; a javascript-only rule must not fire on a .py
            // file just because both languages were requested.
            let applies = match language {
                Some(lang) => compiled.rule.applies_to(lang),
                None => compiled.rule.languages.is_empty(),
            };
            if !applies {
                continue;
            }
            if compiled.regex.is_match(line) {
                findings.push(Finding::Vulnerability(VulnerabilityFinding {
                    id: format!("{}:{}:{}", compiled.rule.id, file_path, line_number),
                    severity: compiled.rule.severity,
                    name: compiled.rule.name.to_string(),
                    description: compiled.rule.description.to_string(),
                    file_path: file_path.to_string(),
                    line_number,
                    code_snippet: snippet(line),
                    recommendation: compiled.rule.recommendation.to_string(),
                    cwe_id: Some(compiled.rule.cwe_id.to_string()),
                    references: compiled
                        .rule
                        .references
                        .iter()
                        .map(|r| r.to_string())
                        .collect(),
                }));
            }
        }
        findings
    }
}

impl Default for VulnerabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for VulnerabilityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Vulnerability
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

        let extensions: BTreeSet<&str> = ctx
            .languages
            .iter()
            .flat_map(|l| l.extensions().iter().copied())
            .collect();

        let walker = DirectoryScanner::new(ctx.scan_depth.max_walk_depth(), self.max_file_size)
            .with_exclude_dirs(self.exclude_dirs.clone())
            .with_max_files(ctx.scan_depth.max_files())
            .with_extensions(extensions.iter().map(|e| e.to_string()).collect());

        let files = walker.scan(root)?;
        let mut findings = Vec::new();
        let mut files_scanned = 0usize;

        for file in &files {
            let Ok(contents) = tokio::fs::read_to_string(&file.path).await else {
                // Binary or unreadable despite the text heuristic; skip it.
                continue;
            };
            files_scanned += 1;
            let rel_path = relative_path(root, &file.path);
            let language = file
                .path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(Language::from_extension);

            for (idx, line) in contents.lines().enumerate() {
                findings.extend(self.scan_line(
                    language,
                    &rel_path,
                    (idx + 1) as u32,
                    line,
                ));
            }
        }

        debug!(
            files_scanned,
            findings = findings.len(),
            "Vulnerability analysis finished"
        );

        Ok(AnalyzerReport {
            findings,
            files_scanned,
            duration_ms: started.elapsed().as_millis() as u64,
            discovered_files: Vec::new(),
        })
    }
}

pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn snippet(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.len() > MAX_SNIPPET_LEN {
        let mut cut = MAX_SNIPPET_LEN;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &trimmed[..cut])
    } else {
        trimmed.to_string()
    }
}
