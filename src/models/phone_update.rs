//! Phone number corrections applied to debtor records

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Set the primary phone of every debtor named `debtor_name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneUpdate {
    pub debtor_name: String,
    pub phone: String,
}

/// TOML document holding `[[update]]` rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneUpdateFile {
    #[serde(default, rename = "update")]
    pub updates: Vec<PhoneUpdate>,
}

impl PhoneUpdateFile {
    pub fn parse(content: &str) -> AppResult<Self> {
        let file: Self = toml::from_str(content).map_err(|e| AppError::Validation {
            field: "update".to_string(),
            reason: e.to_string(),
        })?;

        if let Some(bad) = file
            .updates
            .iter()
            .find(|u| u.debtor_name.trim().is_empty())
        {
            return Err(AppError::Validation {
                field: "update.debtor_name".to_string(),
                reason: format!("empty debtor name for phone '{}'", bad.phone),
            });
        }

        Ok(file)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::Source {
            source_name: path.display().to_string(),
            source: e.into(),
        })?;
        Self::parse(&content)
    }
}
