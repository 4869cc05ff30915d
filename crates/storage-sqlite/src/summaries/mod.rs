//! SQLite storage implementation for financial summaries.

mod model;
mod repository;

pub use model::{DailySummaryDB, MonthlyCategorySummaryDB, MonthlySummaryDB};
pub use repository::SummaryRepository;
