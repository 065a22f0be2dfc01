//! Configuration validation

/// Error raised when a configuration value is out of range or inconsistent
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigValidationError(String);

impl ConfigValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Implemented by every config section that has invariants to check
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigValidationError>;
}
