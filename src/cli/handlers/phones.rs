//! Set-phones command handler

use std::path::Path;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::models::PhoneUpdateFile;
use crate::repositories::ClientRepository;

/// Handler for the set-phones command
pub struct PhonesCommandHandler {
    config: Settings,
}

impl PhonesCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Apply every update in the file inside one transaction
    ///
    /// # Errors
    /// - Unreadable or malformed update file
    /// - An empty update list
    /// - Database connection or update errors (nothing is committed)
    pub async fn execute(&self, file: &Path) -> AppResult<()> {
        let updates = PhoneUpdateFile::load(file)?.updates;
        if updates.is_empty() {
            return Err(AppError::Validation {
                field: "update".to_string(),
                reason: format!("{} contains no [[update]] entries", file.display()),
            });
        }

        let repository = ClientRepository::new(self.config.database.clone());
        let counts = repository.apply_phone_updates(&updates).await?;

        for (update, affected) in updates.iter().zip(&counts) {
            println!(
                "{} -> {} ({} row(s))",
                update.debtor_name, update.phone, affected
            );
            if *affected == 0 {
                tracing::warn!(debtor = %update.debtor_name, "No debtor matched");
            }
        }
        Ok(())
    }
}
