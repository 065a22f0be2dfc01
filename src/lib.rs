//! Sentra - static-analysis scan orchestration and risk-reporting engine
//!
//! Given a repository path and a set of target languages, Sentra runs one or
//! more independent analyzers (vulnerability scanning, dependency checking,
//! secret detection), aggregates their findings into a normalized risk score,
//! and persists the result under a unique scan id for later retrieval.
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with file and environment variable support
//! - [`domain`] — Core domain models, entities, and the analyzer capability trait
//! - [`application`] — Orchestrator, risk scorer, query service, and error taxonomy
//! - [`infrastructure`] — Bundled analyzers, file walker, and result stores
//! - [`logging`] — Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! caller ──► ScanOrchestrator::start_scan ──► [Analyzer × N, fan-out]
//!                                                    │ fan-in
//!                                              merge + risk score
//!                                                    │
//!                                            ResultStore::save
//! caller ──► QueryService::get_scan / list_recent_scans
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sentra::{AnalyzerRegistry, Config, FileResultStore, QueryService, ScanOrchestrator};
//! use sentra::domain::ScanRequest;
//!
//! let config = Config::load()?;
//! let registry = Arc::new(AnalyzerRegistry::with_defaults(&config.analysis));
//! let store = Arc::new(FileResultStore::from_config(&config.storage));
//! let orchestrator = ScanOrchestrator::new(registry, store.clone());
//! let query = QueryService::with_cache_config(store, &config.cache);
//!
//! let ack = orchestrator.start_scan(ScanRequest::new("/path/to/repo")).await?;
//! let result = query.get_scan(ack.scan_id).await?;
//! ```
//!
//! Environment variables use the `SENTRA__` prefix with double underscore
//! separators:
//!
//! ```bash
//! SENTRA__STORAGE__DATA_DIR=/var/lib/sentra
//! SENTRA__LOGGING__LEVEL=debug
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{
    DependencyCheckReport, QueryService, ScanAck, ScanError, ScanOrchestrator, SecretScanReport,
    ValidationError, parse_languages,
};
pub use config::Config;
pub use infrastructure::{AnalyzerRegistry, FileResultStore, InMemoryResultStore, ResultStore};
pub use logging::init_tracing;
