//! Bundled analyzers and the registry the orchestrator selects them from

pub mod dependency;
pub mod secrets;
pub mod vulnerability;
pub mod vulnerability_rules;

pub use dependency::DependencyAnalyzer;
pub use secrets::SecretAnalyzer;
pub use vulnerability::VulnerabilityAnalyzer;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::domain::analyzer::{Analyzer, AnalyzerKind};

/// Registry of analyzers keyed by kind
pub struct AnalyzerRegistry {
    analyzers: HashMap<AnalyzerKind, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self {
            analyzers: HashMap::new(),
        }
    }

    /// Registry preloaded with the three bundled analyzers.
    pub fn with_defaults(config: &AnalysisConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VulnerabilityAnalyzer::with_config(config)));
        registry.register(Arc::new(DependencyAnalyzer::with_config(config)));
        registry.register(Arc::new(SecretAnalyzer::with_config(config)));
        registry
    }

    /// Register an analyzer, replacing any previous one of the same kind.
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        self.analyzers.insert(analyzer.kind(), analyzer);
    }

    pub fn get(&self, kind: AnalyzerKind) -> Option<Arc<dyn Analyzer>> {
        self.analyzers.get(&kind).cloned()
    }

    pub fn registered_kinds(&self) -> Vec<AnalyzerKind> {
        self.analyzers.keys().copied().collect()
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
