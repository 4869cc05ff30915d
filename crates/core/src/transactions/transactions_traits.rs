//! Transaction repository and service traits.
//!
//! These traits define the contract for transaction operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::transactions_model::{
    Category, DateFilter, NewTransaction, Transaction, TransactionPage, TransactionQuery,
    TransactionType, TransactionUpdate, TypeTotals,
};
use crate::errors::Result;

/// Trait defining the contract for Transaction repository operations.
///
/// Reads are synchronous against the connection pool; writes are async
/// because implementations serialize them through a single writer.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Retrieves a transaction by id, scoped to its owner.
    fn get_by_id(&self, transaction_id: &str, user_id: &str) -> Result<Transaction>;

    /// All transactions of the user dated within `[start, end]` (inclusive),
    /// ordered by date then creation time.
    fn find_in_range(&self, user_id: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Transaction>>;

    /// Paged search. `page` is 1-based.
    fn search(
        &self,
        user_id: &str,
        query: &TransactionQuery,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage>;

    /// All transactions linked to a savings goal.
    fn find_by_savings_goal(&self, user_id: &str, savings_goal_id: &str)
        -> Result<Vec<Transaction>>;

    /// Income/expense totals for the user over the given date filter.
    fn sum_by_type(&self, user_id: &str, filter: DateFilter) -> Result<TypeTotals>;

    /// Total of the user's transactions matching category and type within
    /// `[start, end_exclusive)`.
    fn sum_by_category_type_range(
        &self,
        user_id: &str,
        category: Category,
        transaction_type: TransactionType,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Decimal>;

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Replaces the stored transaction and returns the new state.
    async fn update(&self, transaction_update: TransactionUpdate) -> Result<Transaction>;

    /// Deletes the transaction and returns the state it had.
    async fn delete(&self, transaction_id: &str, user_id: &str) -> Result<Transaction>;
}

/// Trait defining the contract for Transaction service operations.
///
/// Every mutation is followed by summary maintenance for the affected keys.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, transaction_id: &str, user_id: &str) -> Result<Transaction>;

    fn search_transactions(
        &self,
        user_id: &str,
        query: &TransactionQuery,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<TransactionPage>;

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn update_transaction(&self, transaction_update: TransactionUpdate)
        -> Result<Transaction>;

    async fn delete_transaction(&self, transaction_id: &str, user_id: &str) -> Result<Transaction>;
}
