use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use ledgerly_core::errors::{Error, Result};
use ledgerly_core::goals::{
    NewSavingsGoal, SavingsGoal, SavingsGoalQuery, SavingsGoalRepositoryTrait,
};

use super::model::{SavingsGoalChangesetDB, SavingsGoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::savings_goals;
use crate::schema::savings_goals::dsl::*;
use crate::utils::format_date;

pub struct SavingsGoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn not_found(goal_id: &str) -> Error {
    Error::NotFound(format!("Savings goal {}", goal_id))
}

impl SavingsGoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SavingsGoalRepository { pool, writer }
    }
}

#[async_trait]
impl SavingsGoalRepositoryTrait for SavingsGoalRepository {
    fn find_all(&self, owner: &str, query: SavingsGoalQuery) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let mut q = savings_goals
            .filter(user_id.eq(owner.to_string()))
            .into_boxed();
        if let Some(from) = query.due_on_or_after {
            q = q.filter(due_date.is_null().or(due_date.ge(format_date(from))));
        }
        let rows = q
            .order((due_date.is_null().asc(), due_date.asc(), name.asc()))
            .select(SavingsGoalDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| SavingsGoal::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_by_id(&self, goal_id: &str, owner: &str) -> Result<SavingsGoal> {
        let mut conn = get_connection(&self.pool)?;
        let row = savings_goals
            .filter(id.eq(goal_id))
            .filter(user_id.eq(owner))
            .select(SavingsGoalDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| not_found(goal_id))?;
        Ok(SavingsGoal::try_from(row)?)
    }

    async fn insert_new_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let goal_id = new_goal
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = SavingsGoalDB::from_new(goal_id, new_goal, Utc::now().naive_utc());
                let inserted = diesel::insert_into(savings_goals::table)
                    .values(&row)
                    .returning(SavingsGoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(SavingsGoal::try_from(inserted)?)
            })
            .await
    }

    async fn update_goal(&self, goal_update: SavingsGoal) -> Result<SavingsGoal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let changes = SavingsGoalChangesetDB::from_domain(&goal_update, Utc::now().naive_utc());
                let updated = diesel::update(
                    savings_goals
                        .filter(id.eq(&goal_update.id))
                        .filter(user_id.eq(&goal_update.user_id)),
                )
                .set(&changes)
                .returning(SavingsGoalDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| not_found(&goal_update.id))?;
                Ok(SavingsGoal::try_from(updated)?)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str, owner: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(savings_goals.filter(id.eq(goal_id)).filter(user_id.eq(owner)))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
