//! Application layer - orchestration, scoring, and queries

pub mod errors;
pub mod orchestrator;
pub mod query;
pub mod scoring;

pub use errors::{ScanError, ValidationError};
pub use orchestrator::{
    DependencyCheckReport, ScanAck, ScanOrchestrator, SecretScanReport, parse_languages,
};
pub use query::QueryService;
