//! Database models for savings goals.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_amount, format_date, parse_amount, parse_date, parse_label};
use ledgerly_core::goals::{NewSavingsGoal, SavingsGoal};

/// Database model for savings goals
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavingsGoalDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: String,
    pub saved_amount: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(treat_none_as_null = true)]
pub struct SavingsGoalChangesetDB {
    pub name: String,
    pub target_amount: String,
    pub saved_amount: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl SavingsGoalDB {
    pub fn from_new(id: String, domain: NewSavingsGoal, now: NaiveDateTime) -> Self {
        Self {
            id,
            user_id: domain.user_id,
            name: domain.name,
            target_amount: format_amount(domain.target_amount),
            saved_amount: format_amount(domain.saved_amount),
            priority: domain.priority.as_str().to_string(),
            due_date: domain.due_date.map(format_date),
            created_at: now,
            updated_at: now,
        }
    }
}

impl SavingsGoalChangesetDB {
    pub fn from_domain(domain: &SavingsGoal, now: NaiveDateTime) -> Self {
        Self {
            name: domain.name.clone(),
            target_amount: format_amount(domain.target_amount),
            saved_amount: format_amount(domain.saved_amount),
            priority: domain.priority.as_str().to_string(),
            due_date: domain.due_date.map(format_date),
            updated_at: now,
        }
    }
}

impl TryFrom<SavingsGoalDB> for SavingsGoal {
    type Error = StorageError;

    fn try_from(db: SavingsGoalDB) -> Result<Self, Self::Error> {
        Ok(Self {
            target_amount: parse_amount(&db.target_amount, "savings_goals.target_amount"),
            saved_amount: parse_amount(&db.saved_amount, "savings_goals.saved_amount"),
            priority: parse_label(&db.priority, "savings_goals.priority")?,
            due_date: db
                .due_date
                .as_deref()
                .map(|d| parse_date(d, "savings_goals.due_date"))
                .transpose()?,
            id: db.id,
            user_id: db.user_id,
            name: db.name,
        })
    }
}
