//! Configuration validation logic
//!
//! Validation methods for every configuration section so that bad values
//! are reported before a run starts.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ChannelConfig, DatabaseConfig, DeliveryConfig, FileSettings, LoggerSettings, QueryConfig,
    Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL, when given, must use a postgres scheme
    /// - Credential file path must not be empty when no URL is given
    /// - Connection timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.is_empty() && !self.is_valid_database_url() {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.url.is_empty() && self.credentials_file.trim().is_empty() {
            return Err(ConfigError::validation(
                "database.credentials_file",
                "Either database.url or database.credentials_file must be set.",
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")
    }
}

impl QueryConfig {
    /// Validate query configuration
    ///
    /// # Validation Rules
    /// - Due offset must not be negative
    /// - Limit must not be negative (0 means unlimited)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.due_in_days < 0 {
            return Err(ConfigError::validation(
                "query.due_in_days",
                "Due offset must be zero or a positive number of days.",
            ));
        }

        if self.limit < 0 {
            return Err(ConfigError::validation(
                "query.limit",
                "Limit must be zero (unlimited) or a positive number.",
            ));
        }

        Ok(())
    }
}

impl DeliveryConfig {
    /// Validate delivery configuration
    ///
    /// # Validation Rules
    /// - Country code must be 1 to 3 ASCII digits
    /// - Decimal and thousands separators must differ
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = &self.country_code;
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::validation(
                "delivery.country_code",
                format!("Country code must be 1 to 3 digits, got '{}'.", code),
            ));
        }

        if self.currency.decimal_separator.is_empty() {
            return Err(ConfigError::validation(
                "delivery.currency.decimal_separator",
                "Decimal separator cannot be empty.",
            ));
        }

        if self.currency.decimal_separator == self.currency.thousands_separator {
            return Err(ConfigError::validation(
                "delivery.currency",
                "Decimal and thousands separators must differ.",
            ));
        }

        Ok(())
    }
}

impl ChannelConfig {
    /// Validate channel configuration
    ///
    /// # Validation Rules
    /// - WebDriver and base URLs must be http(s)
    /// - Authentication, send and request timeouts must be greater than 0
    /// - Poll interval must be greater than 0
    /// - Ready selector and send button XPath must not be empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("channel.webdriver_url", &self.webdriver_url),
            ("channel.base_url", &self.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::validation(
                    field,
                    format!("Expected an http(s) URL, got '{}'.", url),
                ));
            }
        }

        for (field, value) in [
            ("channel.auth_timeout", self.auth_timeout),
            ("channel.send_timeout", self.send_timeout),
            ("channel.request_timeout", self.request_timeout),
        ] {
            if value == 0 {
                return Err(ConfigError::validation(
                    field,
                    "Timeout must be greater than 0 seconds.",
                ));
            }
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "channel.poll_interval_ms",
                "Poll interval must be greater than 0 milliseconds.",
            ));
        }

        if self.ready_selector.trim().is_empty() {
            return Err(ConfigError::validation(
                "channel.ready_selector",
                "Ready selector cannot be empty.",
            ));
        }

        if self.send_button_xpath.trim().is_empty() {
            return Err(ConfigError::validation(
                "channel.send_button_xpath",
                "Send button XPath cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "Log file path cannot be empty when file logging is enabled.",
            ));
        }

        let format = self.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Level must be a known level
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.query.validate()?;
        self.delivery.validate()?;
        self.channel.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
