use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use ledgerly_core::errors::{Error, Result};
use ledgerly_core::transactions::{
    Category, DateFilter, NewTransaction, Transaction, TransactionPage, TransactionQuery,
    TransactionRepositoryTrait, TransactionType, TransactionUpdate, TypeTotals,
};

use super::model::{TransactionChangesetDB, TransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::transactions;
use crate::schema::transactions::dsl::*;
use crate::utils::{format_date, parse_amount, parse_label, sum_amounts};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn to_domain(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter()
        .map(|row| Transaction::try_from(row).map_err(Error::from))
        .collect()
}

fn not_found(transaction_id: &str) -> Error {
    Error::NotFound(format!("Transaction {}", transaction_id))
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn load_owned(
        conn: &mut SqliteConnection,
        transaction_id: &str,
        owner: &str,
    ) -> Result<Option<TransactionDB>> {
        transactions
            .filter(id.eq(transaction_id))
            .filter(user_id.eq(owner))
            .select(TransactionDB::as_select())
            .first(conn)
            .optional()
            .into_core()
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str, owner: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = Self::load_owned(&mut conn, transaction_id, owner)?
            .ok_or_else(|| not_found(transaction_id))?;
        Ok(Transaction::try_from(row)?)
    }

    fn find_in_range(
        &self,
        owner: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions
            .filter(user_id.eq(owner))
            .filter(date.ge(format_date(start)))
            .filter(date.le(format_date(end)))
            .order((date.asc(), created_at.asc()))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        to_domain(rows)
    }

    fn search(
        &self,
        owner: &str,
        query: &TransactionQuery,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage> {
        let mut conn = get_connection(&self.pool)?;

        let filtered = || {
            let mut q = transactions::table
                .filter(user_id.eq(owner.to_string()))
                .into_boxed();
            if let Some(start) = query.start {
                q = q.filter(date.ge(format_date(start)));
            }
            if let Some(end) = query.end {
                q = q.filter(date.le(format_date(end)));
            }
            if let Some(kind) = query.transaction_type {
                q = q.filter(transaction_type.eq(kind.as_str()));
            }
            if let Some(cat) = query.category {
                q = q.filter(category.eq(cat.as_str()));
            }
            q
        };

        let offset = page
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(page_size))
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| Error::invalid_input(format!("Page {} is out of range", page)))?;

        let total: i64 = filtered().count().get_result(&mut conn).into_core()?;
        let rows = filtered()
            .order((date.desc(), created_at.desc()))
            .limit(page_size)
            .offset(offset)
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;

        Ok(TransactionPage {
            data: to_domain(rows)?,
            total,
            page,
            page_size,
        })
    }

    fn find_by_savings_goal(&self, owner: &str, goal_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions
            .filter(user_id.eq(owner))
            .filter(savings_goal_id.eq(goal_id))
            .order((date.asc(), created_at.asc()))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        to_domain(rows)
    }

    fn sum_by_type(&self, owner: &str, filter: DateFilter) -> Result<TypeTotals> {
        let mut conn = get_connection(&self.pool)?;
        let mut q = transactions
            .filter(user_id.eq(owner.to_string()))
            .select((transaction_type, amount))
            .into_boxed();
        q = match filter {
            DateFilter::On(day) => q.filter(date.eq(format_date(day))),
            DateFilter::Range {
                start,
                end_exclusive,
            } => q
                .filter(date.ge(format_date(start)))
                .filter(date.lt(format_date(end_exclusive))),
        };
        let rows: Vec<(String, String)> = q.load(&mut conn).into_core()?;

        let mut totals = TypeTotals::default();
        for (kind, value) in rows {
            let kind: TransactionType =
                parse_label(&kind, "transactions.transaction_type").map_err(Error::from)?;
            totals.add(kind, parse_amount(&value, "transactions.amount"));
        }
        Ok(totals)
    }

    fn sum_by_category_type_range(
        &self,
        owner: &str,
        cat: Category,
        kind: TransactionType,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let amounts: Vec<String> = transactions
            .filter(user_id.eq(owner))
            .filter(category.eq(cat.as_str()))
            .filter(transaction_type.eq(kind.as_str()))
            .filter(date.ge(format_date(start)))
            .filter(date.lt(format_date(end_exclusive)))
            .select(amount)
            .load(&mut conn)
            .into_core()?;
        Ok(sum_amounts(amounts, "transactions.amount"))
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let new_id = new_transaction
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::now_v7().to_string());
                let row = TransactionDB::from_new(new_id, new_transaction, Utc::now().naive_utc());
                let inserted = diesel::insert_into(transactions::table)
                    .values(&row)
                    .returning(TransactionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Transaction::try_from(inserted)?)
            })
            .await
    }

    async fn update(&self, transaction_update: TransactionUpdate) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let changes =
                    TransactionChangesetDB::from_update(&transaction_update, Utc::now().naive_utc());
                let updated = diesel::update(
                    transactions
                        .filter(id.eq(&transaction_update.id))
                        .filter(user_id.eq(&transaction_update.user_id)),
                )
                .set(&changes)
                .returning(TransactionDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| not_found(&transaction_update.id))?;
                Ok(Transaction::try_from(updated)?)
            })
            .await
    }

    async fn delete(&self, transaction_id: &str, owner: &str) -> Result<Transaction> {
        let transaction_id = transaction_id.to_string();
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let existing = Self::load_owned(conn, &transaction_id, &owner)?
                    .ok_or_else(|| not_found(&transaction_id))?;
                diesel::delete(transactions.filter(id.eq(&transaction_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(Transaction::try_from(existing)?)
            })
            .await
    }
}
