use async_trait::async_trait;
use std::sync::Arc;

use super::goals_model::{NewSavingsGoal, SavingsGoal, SavingsGoalQuery};
use super::goals_traits::{SavingsGoalRepositoryTrait, SavingsGoalServiceTrait};
use crate::errors::{Error, Result};

pub struct SavingsGoalService {
    goal_repo: Arc<dyn SavingsGoalRepositoryTrait>,
}

impl SavingsGoalService {
    pub fn new(goal_repo: Arc<dyn SavingsGoalRepositoryTrait>) -> Self {
        SavingsGoalService { goal_repo }
    }
}

#[async_trait]
impl SavingsGoalServiceTrait for SavingsGoalService {
    fn get_goals(&self, user_id: &str, query: SavingsGoalQuery) -> Result<Vec<SavingsGoal>> {
        self.goal_repo.find_all(user_id, query)
    }

    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        new_goal.validate()?;
        self.goal_repo.insert_new_goal(new_goal).await
    }

    async fn update_goal(&self, updated_goal_data: SavingsGoal) -> Result<SavingsGoal> {
        if updated_goal_data.target_amount.is_sign_negative() {
            return Err(Error::invalid_input("Goal amounts must not be negative"));
        }
        // Ownership check before the write.
        self.goal_repo
            .get_by_id(&updated_goal_data.id, &updated_goal_data.user_id)?;
        self.goal_repo.update_goal(updated_goal_data).await
    }

    async fn delete_goal(&self, goal_id: &str, user_id: &str) -> Result<()> {
        match self.goal_repo.delete_goal(goal_id, user_id).await? {
            0 => Err(Error::NotFound(format!("Savings goal {}", goal_id))),
            _ => Ok(()),
        }
    }
}
