//! Command handlers for CLI operations
//!
//! One handler per subcommand, separating execution from parsing.

pub mod check;
pub mod credentials;
pub mod phones;
pub mod run;

pub use check::CheckCommandHandler;
pub use credentials::CredentialsCommandHandler;
pub use phones::PhonesCommandHandler;
pub use run::{RunCommandHandler, RunOptions};
