//! Budget domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::transactions::Category;

/// Spending ceiling for one category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub month: u32,
    pub year: i32,
    pub amount: Decimal,
}

/// Input model for creating or replacing a budget. `(user_id, category,
/// month, year)` identifies the budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    #[serde(default)]
    pub user_id: String,
    pub category: Category,
    pub month: u32,
    pub year: i32,
    pub amount: Decimal,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(Error::invalid_input(format!(
                "Budget month must be between 1 and 12, got {}",
                self.month
            )));
        }
        if self.amount.is_sign_negative() {
            return Err(Error::invalid_input("Budget amount must not be negative"));
        }
        Ok(())
    }
}

/// Filter for budget lookups. Absent fields do not restrict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}
