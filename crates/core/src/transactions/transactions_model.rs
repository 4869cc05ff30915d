//! Transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::AMOUNT_DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::invalid_input(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Transaction categories. Each category belongs to exactly one
/// [`TransactionType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // Income
    Salary,
    Freelance,
    Business,
    Investments,
    Gifts,
    OtherIncome,
    // Expense
    Food,
    Housing,
    Transportation,
    Utilities,
    Healthcare,
    Entertainment,
    Shopping,
    Education,
    Travel,
    SavingsInvestments,
    OtherExpense,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::Salary,
        Category::Freelance,
        Category::Business,
        Category::Investments,
        Category::Gifts,
        Category::OtherIncome,
        Category::Food,
        Category::Housing,
        Category::Transportation,
        Category::Utilities,
        Category::Healthcare,
        Category::Entertainment,
        Category::Shopping,
        Category::Education,
        Category::Travel,
        Category::SavingsInvestments,
        Category::OtherExpense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Business => "business",
            Category::Investments => "investments",
            Category::Gifts => "gifts",
            Category::OtherIncome => "other_income",
            Category::Food => "food",
            Category::Housing => "housing",
            Category::Transportation => "transportation",
            Category::Utilities => "utilities",
            Category::Healthcare => "healthcare",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Education => "education",
            Category::Travel => "travel",
            Category::SavingsInvestments => "savings_investments",
            Category::OtherExpense => "other_expense",
        }
    }

    /// The transaction type this category may be used with.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Category::Salary
            | Category::Freelance
            | Category::Business
            | Category::Investments
            | Category::Gifts
            | Category::OtherIncome => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("Unknown category '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "daily",
            RecurringInterval::Weekly => "weekly",
            RecurringInterval::Monthly => "monthly",
            RecurringInterval::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurringInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(RecurringInterval::Daily),
            "weekly" => Ok(RecurringInterval::Weekly),
            "monthly" => Ok(RecurringInterval::Monthly),
            "yearly" => Ok(RecurringInterval::Yearly),
            other => Err(Error::invalid_input(format!(
                "Unknown recurring interval '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing a recorded transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub savings_goal_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub savings_goal_id: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        validate_fields(
            self.transaction_type,
            self.category,
            self.amount,
            self.recurring,
            self.recurring_interval,
        )
    }
}

/// Input model for updating an existing transaction. Every field is
/// replaced; `user_id` is used only for the ownership check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub savings_goal_id: Option<String>,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        validate_fields(
            self.transaction_type,
            self.category,
            self.amount,
            self.recurring,
            self.recurring_interval,
        )
    }
}

fn validate_fields(
    transaction_type: TransactionType,
    category: Category,
    amount: Decimal,
    recurring: bool,
    recurring_interval: Option<RecurringInterval>,
) -> Result<()> {
    if amount.is_sign_negative() {
        return Err(Error::invalid_input("Amount must not be negative"));
    }
    if amount.round_dp(AMOUNT_DECIMAL_PRECISION) != amount {
        return Err(Error::invalid_input(format!(
            "Amount must have at most {} decimal places",
            AMOUNT_DECIMAL_PRECISION
        )));
    }
    if category.transaction_type() != transaction_type {
        return Err(Error::invalid_input(format!(
            "Category '{}' cannot be used for {} transactions",
            category, transaction_type
        )));
    }
    if recurring && recurring_interval.is_none() {
        return Err(ValidationError::MissingField("recurringInterval".to_string()).into());
    }
    Ok(())
}

/// Date restriction used by the aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// A single calendar date.
    On(NaiveDate),
    /// Half-open range `[start, end_exclusive)`.
    Range {
        start: NaiveDate,
        end_exclusive: NaiveDate,
    },
}

impl DateFilter {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateFilter::On(day) => date == day,
            DateFilter::Range {
                start,
                end_exclusive,
            } => date >= start && date < end_exclusive,
        }
    }
}

/// Income and expense sums over some filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl TypeTotals {
    pub fn add(&mut self, transaction_type: TransactionType, amount: Decimal) {
        match transaction_type {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }
}

/// Filters for the paged transaction search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub data: Vec<Transaction>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
