//! Recipient sources.
//!
//! A recipient source returns the invoices eligible for a notice. The
//! database-backed implementation lives in `repositories::invoice_repo`; the
//! JSON file implementation here is used for offline runs and tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::QueryConfig;
use crate::error::{AppError, AppResult};
use crate::models::InvoiceRecord;

/// Business parameters of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipientQuery {
    /// Invoices due exactly this many days from today
    pub due_in_days: i32,
    /// Maximum number of records, `None` for all
    pub limit: Option<i64>,
    /// Establishment (branch) code
    pub establishment: i32,
}

impl Default for RecipientQuery {
    fn default() -> Self {
        Self::from(&QueryConfig::default())
    }
}

impl From<&QueryConfig> for RecipientQuery {
    fn from(config: &QueryConfig) -> Self {
        Self {
            due_in_days: config.due_in_days,
            limit: config.limit(),
            establishment: config.establishment,
        }
    }
}

/// Query collaborator returning zero or more homogeneous records
#[async_trait]
pub trait RecipientSource: Send + Sync {
    async fn fetch(&self, query: &RecipientQuery) -> AppResult<Vec<InvoiceRecord>>;

    /// Source description for logs
    fn describe(&self) -> String;
}

/// Reads records from a JSON array on disk
///
/// The file is taken as already filtered; only the limit applies.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source_error(&self, error: impl Into<anyhow::Error>) -> AppError {
        AppError::Source {
            source_name: self.path.display().to_string(),
            source: error.into(),
        }
    }
}

#[async_trait]
impl RecipientSource for JsonFileSource {
    async fn fetch(&self, query: &RecipientQuery) -> AppResult<Vec<InvoiceRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.source_error(e))?;
        let mut records: Vec<InvoiceRecord> =
            serde_json::from_str(&content).map_err(|e| self.source_error(e))?;

        if let Some(limit) = query.limit {
            records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "Loaded records from file");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
