//! Database models for transactions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_amount, format_date, parse_amount, parse_date, parse_label};
use ledgerly_core::transactions::{NewTransaction, Transaction, TransactionUpdate};

/// Database model for transactions
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub transaction_type: String,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub description: Option<String>,
    pub recurring: bool,
    pub recurring_interval: Option<String>,
    pub savings_goal_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Columns replaced by an update. `None` clears the column.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(treat_none_as_null = true)]
pub struct TransactionChangesetDB {
    pub transaction_type: String,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub description: Option<String>,
    pub recurring: bool,
    pub recurring_interval: Option<String>,
    pub savings_goal_id: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn from_new(id: String, domain: NewTransaction, now: NaiveDateTime) -> Self {
        Self {
            id,
            user_id: domain.user_id,
            transaction_type: domain.transaction_type.as_str().to_string(),
            category: domain.category.as_str().to_string(),
            amount: format_amount(domain.amount),
            date: format_date(domain.date),
            description: domain.description,
            recurring: domain.recurring,
            recurring_interval: domain.recurring_interval.map(|i| i.as_str().to_string()),
            savings_goal_id: domain.savings_goal_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TransactionChangesetDB {
    pub fn from_update(domain: &TransactionUpdate, now: NaiveDateTime) -> Self {
        Self {
            transaction_type: domain.transaction_type.as_str().to_string(),
            category: domain.category.as_str().to_string(),
            amount: format_amount(domain.amount),
            date: format_date(domain.date),
            description: domain.description.clone(),
            recurring: domain.recurring,
            recurring_interval: domain.recurring_interval.map(|i| i.as_str().to_string()),
            savings_goal_id: domain.savings_goal_id.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction_type: parse_label(&db.transaction_type, "transactions.transaction_type")?,
            category: parse_label(&db.category, "transactions.category")?,
            amount: parse_amount(&db.amount, "transactions.amount"),
            date: parse_date(&db.date, "transactions.date")?,
            recurring_interval: db
                .recurring_interval
                .as_deref()
                .map(|i| parse_label(i, "transactions.recurring_interval"))
                .transpose()?,
            id: db.id,
            user_id: db.user_id,
            description: db.description,
            recurring: db.recurring,
            savings_goal_id: db.savings_goal_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
