//! Savings goal domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPriority::Low => "low",
            GoalPriority::Medium => "medium",
            GoalPriority::High => "high",
        }
    }
}

impl FromStr for GoalPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(GoalPriority::Low),
            "medium" => Ok(GoalPriority::Medium),
            "high" => Ok(GoalPriority::High),
            other => Err(Error::invalid_input(format!("Unknown priority '{}'", other))),
        }
    }
}

/// Domain model representing a savings goal.
///
/// `saved_amount` is the last stored value; reports recompute it from the
/// goal's linked transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub priority: GoalPriority,
    pub due_date: Option<NaiveDate>,
}

/// Input model for creating a new savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub saved_amount: Decimal,
    pub priority: GoalPriority,
    pub due_date: Option<NaiveDate>,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.target_amount.is_sign_negative() || self.saved_amount.is_sign_negative() {
            return Err(Error::invalid_input("Goal amounts must not be negative"));
        }
        Ok(())
    }
}

/// Filter for savings goal lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalQuery {
    /// When set, only goals without a due date or due on/after this date.
    pub due_on_or_after: Option<NaiveDate>,
}
