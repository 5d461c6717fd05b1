//! Check command handler
//!
//! Prints the effective run parameters after configuration validation.

use crate::config::{CredentialStore, Settings};
use crate::error::AppResult;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate and print the configuration summary
    ///
    /// Loading already validated the settings; this re-runs validation so the
    /// command also works on settings built in code.
    pub fn execute(&self) -> AppResult<()> {
        self.config.validate()?;

        for line in self.summary() {
            println!("{line}");
        }
        println!("Configuration OK");
        Ok(())
    }

    /// Effective parameters, one per line, without secrets
    pub fn summary(&self) -> Vec<String> {
        let c = &self.config;
        let limit = c
            .query
            .limit()
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());

        vec![
            format!("Application:      {} {}", c.application.name, c.application.version),
            format!("Database:         {}", self.database_source()),
            format!("Due in days:      {}", c.query.due_in_days),
            format!("Limit:            {limit}"),
            format!("Establishment:    {}", c.query.establishment),
            format!("Country code:     {}", c.delivery.country_code),
            format!("Sender:           {}", c.delivery.sender_name),
            format!("Message delay:    {} ms", c.delivery.inter_message_delay_ms),
            format!("WebDriver:        {}", c.channel.webdriver_url),
            format!("Web client:       {}", c.channel.base_url),
            format!("Browser profile:  {}", c.channel.profile_dir),
            format!("Login timeout:    {} s", c.channel.auth_timeout),
            format!("Send timeout:     {} s", c.channel.send_timeout),
            format!("Log level:        {}", c.logger.level),
        ]
    }

    fn database_source(&self) -> String {
        let database = &self.config.database;
        if !database.url.is_empty() {
            return "database.url (explicit)".to_string();
        }

        let store = CredentialStore::new(database.credentials_path());
        match store.load() {
            Ok(credentials) => format!(
                "{}@{}/{} (from {})",
                credentials.user,
                credentials.host,
                credentials.database,
                store.path().display()
            ),
            Err(e) => format!("unavailable: {e}"),
        }
    }
}
