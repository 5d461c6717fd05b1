//! Credentials command handler
//!
//! Maintains the database credential file next to the configuration.

use crate::cli::parser::CredentialsAction;
use crate::config::{CredentialStore, Credentials, Settings};
use crate::error::AppResult;

/// Handler for the credentials command
pub struct CredentialsCommandHandler {
    store: CredentialStore,
}

impl CredentialsCommandHandler {
    pub fn new(config: &Settings) -> Self {
        Self::with_store(CredentialStore::new(config.database.credentials_path()))
    }

    pub fn with_store(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn execute(&self, action: &CredentialsAction) -> AppResult<()> {
        match action {
            CredentialsAction::Set {
                host,
                database,
                user,
                password,
                forget,
            } => {
                let credentials = Credentials {
                    host: host.clone(),
                    database: database.clone(),
                    user: user.clone(),
                    secret: password.clone().unwrap_or_default(),
                    remember: !forget,
                };
                self.set(&credentials)
            }
            CredentialsAction::Show => {
                for line in self.show()? {
                    println!("{line}");
                }
                Ok(())
            }
            CredentialsAction::Clear => {
                if self.store.clear()? {
                    println!("Removed {}", self.store.path().display());
                } else {
                    println!("No credential file at {}", self.store.path().display());
                }
                Ok(())
            }
        }
    }

    fn set(&self, credentials: &Credentials) -> AppResult<()> {
        // Fail before writing anything that could never connect
        credentials.database_url()?;
        self.store.save(credentials)?;

        tracing::info!(path = %self.store.path().display(), remember = credentials.remember, "Credentials saved");
        println!("Saved credentials to {}", self.store.path().display());
        if credentials.remember {
            println!(
                "Warning: the password is stored base64 encoded, which is not encryption. \
                 Restrict access to this file."
            );
        }
        Ok(())
    }

    /// Stored credentials with the password masked
    pub fn show(&self) -> AppResult<Vec<String>> {
        let credentials = self.store.load()?;
        let secret = if credentials.secret.is_empty() {
            "(not stored)"
        } else {
            "********"
        };

        Ok(vec![
            format!("File:      {}", self.store.path().display()),
            format!("Host:      {}", credentials.host),
            format!("Database:  {}", credentials.database),
            format!("User:      {}", credentials.user),
            format!("Password:  {secret}"),
        ])
    }
}
