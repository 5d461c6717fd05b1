use thiserror::Error;

use crate::config::credentials::CredentialError;
use crate::config::error::ConfigError;

/// Application-wide error type.
///
/// Per-recipient delivery failures are never surfaced through this type; they
/// are recorded as outcomes in the run report. `AppError` covers failures of
/// a whole command: configuration, data access, or an aborted run.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Recipient source could not be read
    #[error("Recipient source '{source_name}' failed")]
    Source {
        source_name: String,
        #[source]
        source: anyhow::Error,
    },

    /// The delivery run aborted before any recipient was attempted
    #[error("Delivery run aborted: {reason}")]
    RunAborted { reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> Self {
        AppError::Configuration {
            key: "credentials".to_string(),
            source: anyhow::Error::new(error),
        }
    }
}

impl AppError {
    /// Wraps a diesel failure with the operation that was running
    pub fn database(operation: impl Into<String>, error: impl Into<anyhow::Error>) -> Self {
        AppError::Database {
            operation: operation.into(),
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_keeps_field_as_key() {
        let err: AppError = ConfigError::validation("query.due_in_days", "must be >= 0").into();
        match err {
            AppError::Configuration { key, .. } => assert_eq!(key, "query.due_in_days"),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_run_aborted_message() {
        let err = AppError::RunAborted {
            reason: "authentication timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Delivery run aborted: authentication timed out"
        );
    }
}
