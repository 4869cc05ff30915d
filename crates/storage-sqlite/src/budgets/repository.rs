use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use ledgerly_core::budgets::{Budget, BudgetQuery, BudgetRepositoryTrait, NewBudget};
use ledgerly_core::errors::{Error, Result};

use super::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::budgets;
use crate::schema::budgets::dsl::*;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn find_all(&self, owner: &str, query: BudgetQuery) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let mut q = budgets
            .filter(user_id.eq(owner.to_string()))
            .into_boxed();
        if let Some(y) = query.year {
            q = q.filter(year.eq(y));
        }
        if let Some(m) = query.month {
            q = q.filter(month.eq(m as i32));
        }
        let rows = q
            .order((year.asc(), month.asc(), category.asc()))
            .select(BudgetDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| Budget::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn upsert(&self, new_budget: NewBudget) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let row = BudgetDB::from_new(
                    Uuid::new_v4().to_string(),
                    new_budget,
                    Utc::now().naive_utc(),
                );
                let stored = diesel::insert_into(budgets::table)
                    .values(&row)
                    .on_conflict((user_id, category, month, year))
                    .do_update()
                    .set((amount.eq(excluded(amount)), updated_at.eq(excluded(updated_at))))
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Budget::try_from(stored)?)
            })
            .await
    }

    async fn delete(&self, budget_id: &str, owner: &str) -> Result<usize> {
        let budget_id = budget_id.to_string();
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    budgets.filter(id.eq(budget_id)).filter(user_id.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
