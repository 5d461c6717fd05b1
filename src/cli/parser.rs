//! CLI argument parsing with clap
//!
//! Commands, arguments and their help text.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Sends collection reminders for invoices about to fall due
#[derive(Parser, Debug)]
#[command(name = "dunning-rs")]
#[command(about = "Sends collection reminders for invoices about to fall due")]
#[command(long_about = "
dunning-rs queries the ERP database for open invoices due a fixed number of
days from today, renders a collection notice for each debtor and delivers it
through the messaging web client by driving a browser over WebDriver.

A WebDriver server (e.g. chromedriver) must be listening on the configured
channel.webdriver_url. The first run opens the login screen; scan the code
within channel.auth_timeout seconds. The browser profile is kept, so later
runs log in automatically.

EXAMPLES:
    # Deliver reminders for invoices due in 7 days (the default command)
    dunning-rs

    # Preview the notices without opening a browser
    dunning-rs run --dry-run

    # Invoices due in 3 days, at most 20 of them
    dunning-rs run --days 3 --limit 20

    # Deliver from a JSON file instead of the database
    dunning-rs run --input invoices.json

    # Save database credentials (password read from DUNNING_DB_PASSWORD)
    dunning-rs credentials set --host db.local --database erp --user cobranca

    # Check configuration and print the effective run parameters
    dunning-rs check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered files in `config/`.
    /// Environment variable overrides still apply.
    ///
    /// Example: --config /etc/dunning-rs/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch due invoices and deliver reminders (default)
    ///
    /// Examples:
    ///   dunning-rs run                      # Database, browser delivery
    ///   dunning-rs run --dry-run            # Render only, no browser
    ///   dunning-rs run --input due.json     # Records from a JSON file
    Run {
        /// Render and report without opening a browser
        #[arg(long)]
        dry_run: bool,

        /// Read records from a JSON array instead of the database
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file)]
        input: Option<PathBuf>,

        /// Invoices due this many days from today
        #[arg(long, value_name = "DAYS", value_parser = super::validation::validate_days)]
        days: Option<i32>,

        /// Maximum number of invoices, 0 for all
        #[arg(long, value_name = "N", value_parser = super::validation::validate_limit)]
        limit: Option<i64>,

        /// Log level override
        ///
        /// Overrides both the configuration file and --verbose/--quiet.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,
    },

    /// Validate configuration and print the effective run parameters
    Check,

    /// Manage the database credential file
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },

    /// Rewrite debtor phone numbers from a TOML file
    ///
    /// The file holds `[[update]]` tables with `debtor_name` and `phone`.
    /// All updates are applied in one transaction. Meant for preparing test
    /// data before a run.
    SetPhones {
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file)]
        file: PathBuf,
    },
}

/// Credential file operations
#[derive(Subcommand, Debug)]
pub enum CredentialsAction {
    /// Write the credential file
    Set {
        /// Database host, optionally with port (host:port)
        #[arg(long)]
        host: String,

        /// Database name
        #[arg(long)]
        database: String,

        /// Database user
        #[arg(long)]
        user: String,

        /// Database password
        #[arg(long, env = "DUNNING_DB_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Do not store the password
        #[arg(long)]
        forget: bool,
    },

    /// Print the stored credentials with the password masked
    Show,

    /// Delete the credential file
    Clear,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Cross-argument checks clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Credentials {
            action:
                CredentialsAction::Set {
                    password, forget, ..
                },
        }) = &self.command
            && !*forget
            && password.as_deref().is_none_or(str::is_empty)
        {
            return Err(
                "A password is required unless --forget is given. Set DUNNING_DB_PASSWORD or pass --password."
                    .to_string(),
            );
        }

        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
