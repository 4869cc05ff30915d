use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use super::UserId;
use crate::{error::ApiResult, main_lib::AppState};
use ledgerly_core::goals::{NewSavingsGoal, SavingsGoal, SavingsGoalQuery};

async fn get_goals(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<SavingsGoalQuery>,
) -> ApiResult<Json<Vec<SavingsGoal>>> {
    let goals = state.goal_service.get_goals(&user_id, query)?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(mut goal): Json<NewSavingsGoal>,
) -> ApiResult<Json<SavingsGoal>> {
    goal.user_id = user_id;
    let created = state.goal_service.create_goal(goal).await?;
    Ok(Json(created))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(mut goal): Json<SavingsGoal>,
) -> ApiResult<Json<SavingsGoal>> {
    goal.id = id;
    goal.user_id = user_id;
    let updated = state.goal_service.update_goal(goal).await?;
    Ok(Json(updated))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<StatusCode> {
    state.goal_service.delete_goal(&id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/savings-goals", get(get_goals).post(create_goal))
        .route("/savings-goals/{id}", put(update_goal).delete(delete_goal))
}
