use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::budgets_model::{Budget, BudgetQuery, NewBudget};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::errors::{Error, Result};

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
}

impl BudgetService {
    pub fn new(repository: Arc<dyn BudgetRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn get_budgets(&self, user_id: &str, query: BudgetQuery) -> Result<Vec<Budget>> {
        self.repository.find_all(user_id, query)
    }

    async fn upsert_budget(&self, new_budget: NewBudget) -> Result<Budget> {
        new_budget.validate()?;
        debug!(
            "Upserting {} budget for {}-{}",
            new_budget.category, new_budget.year, new_budget.month
        );
        self.repository.upsert(new_budget).await
    }

    async fn delete_budget(&self, budget_id: &str, user_id: &str) -> Result<()> {
        let deleted = self.repository.delete(budget_id, user_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {}", budget_id)));
        }
        Ok(())
    }
}
