//! Database connection module.
//!
//! One short-lived async PostgreSQL connection per command, opened with a
//! bounded connect timeout.

mod connection;

pub use connection::establish_connection;
