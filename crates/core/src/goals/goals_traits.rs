use crate::errors::Result;
use crate::goals::goals_model::{NewSavingsGoal, SavingsGoal, SavingsGoalQuery};
use async_trait::async_trait;

/// Trait for savings goal repository operations
#[async_trait]
pub trait SavingsGoalRepositoryTrait: Send + Sync {
    /// Goals of the user matching the query, ordered by due date (goals
    /// without one last), then name.
    fn find_all(&self, user_id: &str, query: SavingsGoalQuery) -> Result<Vec<SavingsGoal>>;
    fn get_by_id(&self, goal_id: &str, user_id: &str) -> Result<SavingsGoal>;
    async fn insert_new_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(&self, goal_update: SavingsGoal) -> Result<SavingsGoal>;
    async fn delete_goal(&self, goal_id: &str, user_id: &str) -> Result<usize>;
}

/// Trait for savings goal service operations
#[async_trait]
pub trait SavingsGoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str, query: SavingsGoalQuery) -> Result<Vec<SavingsGoal>>;
    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(&self, updated_goal_data: SavingsGoal) -> Result<SavingsGoal>;
    async fn delete_goal(&self, goal_id: &str, user_id: &str) -> Result<()>;
}
