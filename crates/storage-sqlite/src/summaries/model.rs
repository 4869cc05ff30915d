//! Database models for the summary tables.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_amount, format_date, parse_amount, parse_date, parse_label};
use ledgerly_core::summaries::{DailySummary, MonthlyCategorySummary, MonthlySummary};

#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::daily_summaries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailySummaryDB {
    pub user_id: String,
    pub date: String,
    pub total_income: String,
    pub total_expense: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::monthly_summaries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MonthlySummaryDB {
    pub user_id: String,
    pub year: i32,
    pub month: i32,
    pub total_income: String,
    pub total_expense: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::monthly_category_summaries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MonthlyCategorySummaryDB {
    pub user_id: String,
    pub year: i32,
    pub month: i32,
    pub category_id: String,
    pub transaction_type: String,
    pub total_amount: String,
    pub updated_at: NaiveDateTime,
}

impl DailySummaryDB {
    pub fn from_domain(domain: DailySummary, now: NaiveDateTime) -> Self {
        Self {
            user_id: domain.user_id,
            date: format_date(domain.date),
            total_income: format_amount(domain.total_income),
            total_expense: format_amount(domain.total_expense),
            updated_at: now,
        }
    }
}

impl MonthlySummaryDB {
    pub fn from_domain(domain: MonthlySummary, now: NaiveDateTime) -> Self {
        Self {
            user_id: domain.user_id,
            year: domain.year,
            month: domain.month as i32,
            total_income: format_amount(domain.total_income),
            total_expense: format_amount(domain.total_expense),
            updated_at: now,
        }
    }
}

impl MonthlyCategorySummaryDB {
    pub fn from_domain(domain: MonthlyCategorySummary, now: NaiveDateTime) -> Self {
        Self {
            user_id: domain.user_id,
            year: domain.year,
            month: domain.month as i32,
            category_id: domain.category_id.as_str().to_string(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            total_amount: format_amount(domain.total_amount),
            updated_at: now,
        }
    }
}

impl TryFrom<DailySummaryDB> for DailySummary {
    type Error = StorageError;

    fn try_from(db: DailySummaryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&db.date, "daily_summaries.date")?,
            total_income: parse_amount(&db.total_income, "daily_summaries.total_income"),
            total_expense: parse_amount(&db.total_expense, "daily_summaries.total_expense"),
            user_id: db.user_id,
        })
    }
}

impl From<MonthlySummaryDB> for MonthlySummary {
    fn from(db: MonthlySummaryDB) -> Self {
        Self {
            total_income: parse_amount(&db.total_income, "monthly_summaries.total_income"),
            total_expense: parse_amount(&db.total_expense, "monthly_summaries.total_expense"),
            user_id: db.user_id,
            year: db.year,
            month: db.month as u32,
        }
    }
}

impl TryFrom<MonthlyCategorySummaryDB> for MonthlyCategorySummary {
    type Error = StorageError;

    fn try_from(db: MonthlyCategorySummaryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            category_id: parse_label(&db.category_id, "monthly_category_summaries.category_id")?,
            transaction_type: parse_label(
                &db.transaction_type,
                "monthly_category_summaries.transaction_type",
            )?,
            total_amount: parse_amount(
                &db.total_amount,
                "monthly_category_summaries.total_amount",
            ),
            user_id: db.user_id,
            year: db.year,
            month: db.month as u32,
        })
    }
}
