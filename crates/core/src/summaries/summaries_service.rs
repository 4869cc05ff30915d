use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::affected_keys::{affected_keys, owning_user_id};
use super::summaries_model::{
    AffectedKey, DailySummary, MonthlyCategorySummary, MonthlySummary, ResyncResult,
};
use super::summaries_traits::{SummaryRepositoryTrait, SummaryServiceTrait};
use crate::constants::AMOUNT_DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::transactions::{Category, DateFilter, Transaction, TransactionRepositoryTrait, TransactionType};
use crate::utils::time_utils::{month_bounds_exclusive, months_between};

/// Keeps the daily, monthly and category-monthly summary rows in step with
/// the transaction ledger.
///
/// Totals are always re-aggregated from the ledger and written with
/// replace-on-conflict, so running the same recomputation twice leaves the
/// same rows behind.
pub struct SummaryService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    summary_repository: Arc<dyn SummaryRepositoryTrait>,
}

impl SummaryService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        summary_repository: Arc<dyn SummaryRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            summary_repository,
        }
    }

    async fn recompute_daily(&self, user_id: &str, date: NaiveDate) -> Result<()> {
        let totals = self
            .transaction_repository
            .sum_by_type(user_id, DateFilter::On(date))?;
        self.summary_repository
            .upsert_daily(DailySummary {
                user_id: user_id.to_string(),
                date,
                total_income: to_stored_amount(totals.income),
                total_expense: to_stored_amount(totals.expense),
            })
            .await
    }

    async fn recompute_monthly(&self, user_id: &str, year: i32, month: u32) -> Result<()> {
        let (start, end_exclusive) = month_bounds_exclusive(year, month)?;
        let totals = self.transaction_repository.sum_by_type(
            user_id,
            DateFilter::Range {
                start,
                end_exclusive,
            },
        )?;
        self.summary_repository
            .upsert_monthly(MonthlySummary {
                user_id: user_id.to_string(),
                year,
                month,
                total_income: to_stored_amount(totals.income),
                total_expense: to_stored_amount(totals.expense),
            })
            .await
    }

    async fn recompute_category(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
        category: Category,
        transaction_type: TransactionType,
    ) -> Result<()> {
        let (start, end_exclusive) = month_bounds_exclusive(year, month)?;
        let total = self.transaction_repository.sum_by_category_type_range(
            user_id,
            category,
            transaction_type,
            start,
            end_exclusive,
        )?;
        self.summary_repository
            .upsert_monthly_category(MonthlyCategorySummary {
                user_id: user_id.to_string(),
                year,
                month,
                category_id: category,
                transaction_type,
                total_amount: to_stored_amount(total),
            })
            .await
    }

    async fn recompute_key(&self, user_id: &str, key: &AffectedKey, category: Category) -> Result<()> {
        self.recompute_daily(user_id, key.date).await?;
        self.recompute_monthly(user_id, key.year, key.month).await?;
        self.recompute_category(user_id, key.year, key.month, category, key.transaction_type)
            .await
    }

    async fn recompute_keys_inner(
        &self,
        user_id: &str,
        keys: &[AffectedKey],
    ) -> Result<Vec<AffectedKey>> {
        let mut recomputed = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(category) = key.category else {
                error!(
                    "Skipping summary recomputation for user {} on {}: transaction has no category",
                    user_id, key.date
                );
                continue;
            };
            self.recompute_key(user_id, key, category).await?;
            recomputed.push(*key);
        }
        Ok(recomputed)
    }
}

/// Rounds a freshly aggregated total to the stored precision.
fn to_stored_amount(amount: Decimal) -> Decimal {
    amount.round_dp(AMOUNT_DECIMAL_PRECISION)
}

#[async_trait]
impl SummaryServiceTrait for SummaryService {
    async fn handle_transaction_change(
        &self,
        old: Option<&Transaction>,
        new: Option<&Transaction>,
    ) -> Result<Vec<AffectedKey>> {
        let Some(user_id) = owning_user_id(old, new) else {
            warn!("Transaction change without a user id; summaries left untouched");
            return Ok(Vec::new());
        };

        let keys = affected_keys(old, new);
        debug!(
            "Recomputing {} summary key(s) for user {}",
            keys.len(),
            user_id
        );

        self.recompute_keys_inner(user_id, &keys)
            .await
            .map_err(|e| {
                error!("Summary maintenance failed for user {}: {}", user_id, e);
                Error::consistency(e)
            })
    }

    async fn recompute_keys(
        &self,
        user_id: &str,
        keys: &[AffectedKey],
    ) -> Result<Vec<AffectedKey>> {
        let mut distinct: Vec<AffectedKey> = Vec::with_capacity(keys.len());
        for key in keys {
            if !distinct.contains(key) {
                distinct.push(*key);
            }
        }
        self.recompute_keys_inner(user_id, &distinct)
            .await
            .map_err(Error::consistency)
    }

    async fn resync_user(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ResyncResult> {
        if start > end {
            return Err(Error::invalid_input(format!(
                "Resync window start {} is after end {}",
                start, end
            )));
        }

        let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
        let window_months: BTreeSet<(i32, u32)> = months_between(start, end).into_iter().collect();
        let mut months: BTreeSet<(i32, u32)> = BTreeSet::new();
        let mut category_months: BTreeSet<(i32, u32, Category, TransactionType)> = BTreeSet::new();

        for transaction in self
            .transaction_repository
            .find_in_range(user_id, start, end)?
        {
            days.insert(transaction.date);
            months.insert((transaction.date.year(), transaction.date.month()));
            category_months.insert((
                transaction.date.year(),
                transaction.date.month(),
                transaction.category,
                transaction.transaction_type,
            ));
        }

        // Stored rows whose transactions are gone still need to be brought
        // back down to their true totals.
        for row in self.summary_repository.get_daily(user_id, start, end)? {
            days.insert(row.date);
        }
        let years: BTreeSet<i32> = window_months.iter().map(|(year, _)| *year).collect();
        for year in years {
            for row in self.summary_repository.get_monthly(user_id, year)? {
                if window_months.contains(&(row.year, row.month)) {
                    months.insert((row.year, row.month));
                }
            }
            for row in self
                .summary_repository
                .get_monthly_category(user_id, year, None)?
            {
                if window_months.contains(&(row.year, row.month)) {
                    category_months.insert((
                        row.year,
                        row.month,
                        row.category_id,
                        row.transaction_type,
                    ));
                }
            }
        }

        for day in &days {
            self.recompute_daily(user_id, *day).await?;
        }
        for (year, month) in &months {
            self.recompute_monthly(user_id, *year, *month).await?;
        }
        for (year, month, category, transaction_type) in &category_months {
            self.recompute_category(user_id, *year, *month, *category, *transaction_type)
                .await?;
        }

        let result = ResyncResult {
            daily: days.len(),
            monthly: months.len(),
            category_monthly: category_months.len(),
        };
        debug!("Resynced summaries for user {}: {:?}", user_id, result);
        Ok(result)
    }

    fn get_daily_summaries(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummary>> {
        self.summary_repository.get_daily(user_id, start, end)
    }

    fn get_monthly_summaries(&self, user_id: &str, year: i32) -> Result<Vec<MonthlySummary>> {
        self.summary_repository.get_monthly(user_id, year)
    }

    fn get_category_summaries(
        &self,
        user_id: &str,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<MonthlyCategorySummary>> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(Error::invalid_input(format!("Invalid month {}", m)));
            }
        }
        self.summary_repository
            .get_monthly_category(user_id, year, month)
    }
}
