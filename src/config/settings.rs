//! Configuration settings structures
//!
//! All structures can be loaded from TOML files and environment variables.
//! Durations are plain integers: seconds for the long waits, milliseconds for
//! the short pauses around a send.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "dunning-rs".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_credentials_file() -> String {
    "config_db.json".to_string()
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_due_in_days() -> i32 {
    7
}

fn default_query_limit() -> i64 {
    3
}

fn default_country_code() -> String {
    "55".to_string()
}

fn default_inter_message_delay_ms() -> u64 {
    2000
}

fn default_sender_name() -> String {
    "Varejão Farma 💊".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_thousands_separator() -> String {
    ".".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_base_url() -> String {
    "https://web.whatsapp.com".to_string()
}

fn default_profile_dir() -> String {
    "chrome_profile_wpp".to_string()
}

fn default_browser_args() -> Vec<String> {
    vec!["--start-maximized".to_string()]
}

fn default_auth_timeout() -> u64 {
    120
}

fn default_send_timeout() -> u64 {
    35
}

fn default_request_timeout() -> u64 {
    30
}

fn default_pre_click_delay_ms() -> u64 {
    2000
}

fn default_post_click_delay_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_ready_selector() -> String {
    "#side".to_string()
}

fn default_send_button_xpath() -> String {
    r#"//span[@data-icon="send"]/parent::button | //button[@aria-label="Enviar"]"#.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/dunning.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Connection to the ERP database holding receivables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When empty, the URL is built from the
    /// credential file.
    #[serde(default)]
    pub url: String,

    /// Path of the JSON credential file
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            credentials_file: default_credentials_file(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

impl DatabaseConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    pub fn credentials_path(&self) -> PathBuf {
        PathBuf::from(&self.credentials_file)
    }
}

// ============================================================================
// Query Configuration
// ============================================================================

/// Business parameters of the receivables query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Select invoices due exactly this many days from today
    #[serde(default = "default_due_in_days")]
    pub due_in_days: i32,

    /// Maximum number of invoices per run, 0 means no limit
    #[serde(default = "default_query_limit")]
    pub limit: i64,

    /// Establishment (branch) code the receivables belong to
    #[serde(default)]
    pub establishment: i32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            due_in_days: default_due_in_days(),
            limit: default_query_limit(),
            establishment: 0,
        }
    }
}

impl QueryConfig {
    pub fn limit(&self) -> Option<i64> {
        (self.limit > 0).then_some(self.limit)
    }
}

// ============================================================================
// Delivery Configuration
// ============================================================================

/// Currency rendering conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_currency_symbol(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

/// How notices are addressed, worded and paced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Country calling code prefixed to local numbers
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Pause after each send attempt, in milliseconds
    #[serde(default = "default_inter_message_delay_ms")]
    pub inter_message_delay_ms: u64,

    /// Signature at the bottom of every notice
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default)]
    pub currency: CurrencyConfig,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            inter_message_delay_ms: default_inter_message_delay_ms(),
            sender_name: default_sender_name(),
            currency: CurrencyConfig::default(),
        }
    }
}

impl DeliveryConfig {
    pub fn inter_message_delay(&self) -> Duration {
        Duration::from_millis(self.inter_message_delay_ms)
    }
}

// ============================================================================
// Channel Configuration
// ============================================================================

/// Browser-driven messaging session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// WebDriver server (e.g. chromedriver) endpoint
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Messaging web client URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Browser profile directory, kept between runs so the login persists
    #[serde(default = "default_profile_dir")]
    pub profile_dir: String,

    /// Extra browser command line arguments
    #[serde(default = "default_browser_args")]
    pub browser_args: Vec<String>,

    #[serde(default)]
    pub headless: bool,

    /// Wait for the operator to log in, in seconds
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout: u64,

    /// Wait for the send button of one message, in seconds
    #[serde(default = "default_send_timeout")]
    pub send_timeout: u64,

    /// Timeout of a single WebDriver HTTP request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_pre_click_delay_ms")]
    pub pre_click_delay_ms: u64,

    #[serde(default = "default_post_click_delay_ms")]
    pub post_click_delay_ms: u64,

    /// Interval between element lookups while waiting, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// CSS selector present once the client is logged in
    #[serde(default = "default_ready_selector")]
    pub ready_selector: String,

    /// XPath of the send button on the compose screen
    #[serde(default = "default_send_button_xpath")]
    pub send_button_xpath: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            base_url: default_base_url(),
            profile_dir: default_profile_dir(),
            browser_args: default_browser_args(),
            headless: false,
            auth_timeout: default_auth_timeout(),
            send_timeout: default_send_timeout(),
            request_timeout: default_request_timeout(),
            pre_click_delay_ms: default_pre_click_delay_ms(),
            post_click_delay_ms: default_post_click_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            ready_selector: default_ready_selector(),
            send_button_xpath: default_send_button_xpath(),
        }
    }
}

impl ChannelConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout)
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub channel: ChannelConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
