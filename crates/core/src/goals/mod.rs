//! Savings goals module - domain models, services, and traits.

mod goals_model;
mod goals_service;
mod goals_traits;

pub use goals_model::{GoalPriority, NewSavingsGoal, SavingsGoal, SavingsGoalQuery};
pub use goals_service::SavingsGoalService;
pub use goals_traits::{SavingsGoalRepositoryTrait, SavingsGoalServiceTrait};
