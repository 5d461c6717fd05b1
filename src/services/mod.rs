//! Service layer.
//!
//! The delivery pipeline and its recipient sources.

pub mod delivery;
pub mod recipients;

pub use delivery::{DeliveryOrchestrator, RunReport};
pub use recipients::{JsonFileSource, RecipientQuery, RecipientSource};
