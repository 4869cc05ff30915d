//! Summary domain models.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::{Category, Transaction, TransactionType};

/// Per-day income/expense totals of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub user_id: String,
    pub date: NaiveDate,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

/// Per-month income/expense totals of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

/// Per-month total of one user's transactions for a single category and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCategorySummary {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub category_id: Category,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub total_amount: Decimal,
}

/// The summary coordinates a single transaction state contributes to.
///
/// `month` is 1-based. `category` is optional so keys built from foreign
/// input can be represented; keys without a category are skipped during
/// recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedKey {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub category: Option<Category>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl AffectedKey {
    pub fn new(
        date: NaiveDate,
        category: Option<Category>,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            date,
            year: date.year(),
            month: date.month(),
            category,
            transaction_type,
        }
    }

    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self::new(
            transaction.date,
            Some(transaction.category),
            transaction.transaction_type,
        )
    }
}

/// Counts of the rows recomputed by a resync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncResult {
    pub daily: usize,
    pub monthly: usize,
    pub category_monthly: usize,
}
