//! Incremental summary maintenance.
//!
//! Daily, monthly and category-monthly totals are recomputed from the
//! transaction ledger whenever a transaction changes, and upserted with
//! replace-on-conflict semantics.

mod affected_keys;
mod summaries_model;
mod summaries_service;
mod summaries_traits;

pub use affected_keys::{affected_keys, owning_user_id};
pub use summaries_model::*;
pub use summaries_service::SummaryService;
pub use summaries_traits::{SummaryRepositoryTrait, SummaryServiceTrait};
