//! Infrastructure layer - analyzers, file walking, and persistence

pub mod analyzers;
pub mod store;
pub mod walker;

pub use analyzers::AnalyzerRegistry;
pub use store::{FileResultStore, InMemoryResultStore, ResultStore, StorageError};
pub use walker::DirectoryScanner;
