//! SQLite storage for Ledgerly.
//!
//! Implements the repository traits declared in `ledgerly-core` with Diesel.
//! This crate is the only place where Diesel types appear; the domain crate
//! and the server only see the traits.
//!
//! Reads go through the r2d2 pool. Writes are serialized through a single
//! writer task (see [`db::write_actor`]) so every write job runs inside one
//! immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

pub mod budgets;
pub mod goals;
pub mod reports;
pub mod summaries;
pub mod transactions;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use budgets::BudgetRepository;
pub use goals::SavingsGoalRepository;
pub use reports::ReportRepository;
pub use summaries::SummaryRepository;
pub use transactions::TransactionRepository;

pub use ledgerly_core::errors::{DatabaseError, Error, Result};
