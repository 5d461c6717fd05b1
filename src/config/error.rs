//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required configuration file is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// File contents do not match the settings layout
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A setting holds a value the run cannot use
    #[error("Invalid setting {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `DUNNING_APP_ENV` names an unknown environment
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    /// Both a configuration directory and a single file were requested
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn conflicting_sources<S: Into<String>>(message: S) -> Self {
        ConfigError::ConflictingSources(message.into())
    }

    /// Dotted name of the offending setting, for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::ValidationError { field, .. } => Some(field),
            _ => None,
        }
    }
}
