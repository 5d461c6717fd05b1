//! Repository layer for data access operations.
//!
//! Raw SQL against the ERP receivables (`ctrec`) and debtor (`clien`) tables.

mod client_repo;
mod invoice_repo;

pub use client_repo::ClientRepository;
pub use invoice_repo::PgRecipientSource;
