//! SQLite storage implementation for savings goals.

mod model;
mod repository;

pub use model::{SavingsGoalChangesetDB, SavingsGoalDB};
pub use repository::SavingsGoalRepository;
