use async_trait::async_trait;
use chrono::NaiveDate;

use super::summaries_model::{
    AffectedKey, DailySummary, MonthlyCategorySummary, MonthlySummary, ResyncResult,
};
use crate::errors::Result;
use crate::transactions::Transaction;

/// Trait for summary repository operations.
///
/// Every upsert inserts the row or, on key conflict, replaces its totals.
#[async_trait]
pub trait SummaryRepositoryTrait: Send + Sync {
    async fn upsert_daily(&self, summary: DailySummary) -> Result<()>;

    async fn upsert_monthly(&self, summary: MonthlySummary) -> Result<()>;

    async fn upsert_monthly_category(&self, summary: MonthlyCategorySummary) -> Result<()>;

    /// Daily rows of the user within `[start, end]`, ordered by date.
    fn get_daily(&self, user_id: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<DailySummary>>;

    /// Monthly rows of the user for a year, ordered by month.
    fn get_monthly(&self, user_id: &str, year: i32) -> Result<Vec<MonthlySummary>>;

    /// Category rows of the user for a year, optionally narrowed to one month.
    fn get_monthly_category(
        &self,
        user_id: &str,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<MonthlyCategorySummary>>;
}

/// Trait for summary service operations
#[async_trait]
pub trait SummaryServiceTrait: Send + Sync {
    /// Recomputes the summaries affected by a transaction change. `old` is
    /// absent on create and `new` is absent on delete. Returns the keys that
    /// were recomputed.
    async fn handle_transaction_change(
        &self,
        old: Option<&Transaction>,
        new: Option<&Transaction>,
    ) -> Result<Vec<AffectedKey>>;

    /// Recomputes the given keys for a user. Keys without a category are
    /// skipped. Returns the keys that were recomputed.
    async fn recompute_keys(&self, user_id: &str, keys: &[AffectedKey])
        -> Result<Vec<AffectedKey>>;

    /// Recomputes every summary row of the user inside `[start, end]`.
    async fn resync_user(&self, user_id: &str, start: NaiveDate, end: NaiveDate)
        -> Result<ResyncResult>;

    fn get_daily_summaries(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummary>>;

    fn get_monthly_summaries(&self, user_id: &str, year: i32) -> Result<Vec<MonthlySummary>>;

    fn get_category_summaries(
        &self,
        user_id: &str,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<MonthlyCategorySummary>>;
}
