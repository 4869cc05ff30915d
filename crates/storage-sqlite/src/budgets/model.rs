//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_amount, parse_amount, parse_label};
use ledgerly_core::budgets::{Budget, NewBudget};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub month: i32,
    pub year: i32,
    pub amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetDB {
    pub fn from_new(id: String, domain: NewBudget, now: NaiveDateTime) -> Self {
        Self {
            id,
            user_id: domain.user_id,
            category: domain.category.as_str().to_string(),
            month: domain.month as i32,
            year: domain.year,
            amount: format_amount(domain.amount),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<BudgetDB> for Budget {
    type Error = StorageError;

    fn try_from(db: BudgetDB) -> Result<Self, Self::Error> {
        Ok(Self {
            category: parse_label(&db.category, "budgets.category")?,
            amount: parse_amount(&db.amount, "budgets.amount"),
            id: db.id,
            user_id: db.user_id,
            month: db.month as u32,
            year: db.year,
        })
    }
}
