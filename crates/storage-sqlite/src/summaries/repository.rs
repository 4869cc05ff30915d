use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use log::trace;
use std::sync::Arc;

use ledgerly_core::errors::{Error, Result};
use ledgerly_core::summaries::{
    DailySummary, MonthlyCategorySummary, MonthlySummary, SummaryRepositoryTrait,
};

use super::model::{DailySummaryDB, MonthlyCategorySummaryDB, MonthlySummaryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{daily_summaries, monthly_category_summaries, monthly_summaries};
use crate::utils::format_date;

/// Summary rows are written with insert-or-replace-totals; the stored value
/// is always the latest recomputation.
pub struct SummaryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SummaryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SummaryRepositoryTrait for SummaryRepository {
    async fn upsert_daily(&self, summary: DailySummary) -> Result<()> {
        let row = DailySummaryDB::from_domain(summary, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                use crate::schema::daily_summaries::dsl::*;
                trace!("upsert daily summary {} {}", row.user_id, row.date);
                diesel::insert_into(daily_summaries)
                    .values(&row)
                    .on_conflict((user_id, date))
                    .do_update()
                    .set((
                        total_income.eq(excluded(total_income)),
                        total_expense.eq(excluded(total_expense)),
                        updated_at.eq(excluded(updated_at)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn upsert_monthly(&self, summary: MonthlySummary) -> Result<()> {
        let row = MonthlySummaryDB::from_domain(summary, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                use crate::schema::monthly_summaries::dsl::*;
                diesel::insert_into(monthly_summaries)
                    .values(&row)
                    .on_conflict((user_id, year, month))
                    .do_update()
                    .set((
                        total_income.eq(excluded(total_income)),
                        total_expense.eq(excluded(total_expense)),
                        updated_at.eq(excluded(updated_at)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn upsert_monthly_category(&self, summary: MonthlyCategorySummary) -> Result<()> {
        let row = MonthlyCategorySummaryDB::from_domain(summary, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                use crate::schema::monthly_category_summaries::dsl::*;
                diesel::insert_into(monthly_category_summaries)
                    .values(&row)
                    .on_conflict((user_id, year, month, category_id, transaction_type))
                    .do_update()
                    .set((
                        total_amount.eq(excluded(total_amount)),
                        updated_at.eq(excluded(updated_at)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn get_daily(&self, owner: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailySummary>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_summaries::table
            .filter(daily_summaries::user_id.eq(owner))
            .filter(daily_summaries::date.ge(format_date(start)))
            .filter(daily_summaries::date.le(format_date(end)))
            .order(daily_summaries::date.asc())
            .select(DailySummaryDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| DailySummary::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_monthly(&self, owner: &str, for_year: i32) -> Result<Vec<MonthlySummary>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_summaries::table
            .filter(monthly_summaries::user_id.eq(owner))
            .filter(monthly_summaries::year.eq(for_year))
            .order(monthly_summaries::month.asc())
            .select(MonthlySummaryDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(MonthlySummary::from).collect())
    }

    fn get_monthly_category(
        &self,
        owner: &str,
        for_year: i32,
        for_month: Option<u32>,
    ) -> Result<Vec<MonthlyCategorySummary>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = monthly_category_summaries::table
            .filter(monthly_category_summaries::user_id.eq(owner.to_string()))
            .filter(monthly_category_summaries::year.eq(for_year))
            .into_boxed();
        if let Some(m) = for_month {
            query = query.filter(monthly_category_summaries::month.eq(m as i32));
        }
        let rows = query
            .order((
                monthly_category_summaries::month.asc(),
                monthly_category_summaries::transaction_type.asc(),
                monthly_category_summaries::category_id.asc(),
            ))
            .select(MonthlyCategorySummaryDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| MonthlyCategorySummary::try_from(row).map_err(Error::from))
            .collect()
    }
}
