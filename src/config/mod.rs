//! Configuration management
//!
//! Layered loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Per-environment files (development, test, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `DUNNING_*` environment variables
//!
//! Database credentials live in a separate small JSON file handled by
//! [`credentials`].

pub mod credentials;
pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use credentials::{CredentialStore, Credentials};
pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{
    ChannelConfig, CurrencyConfig, DatabaseConfig, DeliveryConfig, QueryConfig, Settings,
};
