//! Ledgerly Core - Domain entities, services, and traits.
//!
//! This crate contains the summary maintenance and report synthesis logic.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod budgets;
pub mod constants;
pub mod errors;
pub mod events;
pub mod goals;
pub mod reports;
pub mod summaries;
pub mod transactions;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
