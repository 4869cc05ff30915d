use async_trait::async_trait;

use super::budgets_model::{Budget, BudgetQuery, NewBudget};
use crate::errors::Result;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// Budgets of the user matching the query, ordered by year, month, category.
    fn find_all(&self, user_id: &str, query: BudgetQuery) -> Result<Vec<Budget>>;

    /// Inserts the budget or replaces the amount of the existing one with
    /// the same `(user_id, category, month, year)`.
    async fn upsert(&self, new_budget: NewBudget) -> Result<Budget>;

    async fn delete(&self, budget_id: &str, user_id: &str) -> Result<usize>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn get_budgets(&self, user_id: &str, query: BudgetQuery) -> Result<Vec<Budget>>;
    async fn upsert_budget(&self, new_budget: NewBudget) -> Result<Budget>;
    async fn delete_budget(&self, budget_id: &str, user_id: &str) -> Result<()>;
}
