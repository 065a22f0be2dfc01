//! Configuration management
//!
//! Strongly-typed configuration loaded from optional files under `config/`
//! and `SENTRA__`-prefixed environment variables with `__` separators, e.g.
//! `SENTRA__STORAGE__DATA_DIR=/var/lib/sentra`.

pub mod validation;

pub use validation::{ConfigValidationError, Validate};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Analyzer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Files larger than this are skipped by every analyzer
    pub max_file_size_bytes: u64,
    /// Directory names pruned from the walk
    pub excluded_dirs: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 1024 * 1024,
            excluded_dirs: crate::infrastructure::walker::DirectoryScanner::default_excludes(),
        }
    }
}

/// Result store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for the file-backed store
    pub data_dir: PathBuf,
    /// Cap on the recent-scan index
    pub max_index_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            max_index_entries: crate::infrastructure::store::MAX_INDEX_ENTRIES,
        }
    }
}

/// Query-service result cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_entries: 1024,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.analysis.max_file_size_bytes == 0 {
            return Err(ConfigValidationError::new(
                "analysis.max_file_size_bytes must be > 0",
            ));
        }
        if self.storage.max_index_entries == 0 {
            return Err(ConfigValidationError::new(
                "storage.max_index_entries must be > 0",
            ));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(ConfigValidationError::new("cache.ttl_seconds must be > 0"));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SENTRA").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("configuration validation error: {0}")]
    Validation(#[from] ConfigValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_index_cap_is_rejected() {
        let mut config = Config::default();
        config.storage.max_index_entries = 0;
        assert!(config.validate().is_err());
    }
}
