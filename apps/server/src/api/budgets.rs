use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use super::UserId;
use crate::{error::ApiResult, main_lib::AppState};
use ledgerly_core::budgets::{Budget, BudgetQuery, NewBudget};

async fn get_budgets(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<BudgetQuery>,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = state.budget_service.get_budgets(&user_id, query)?;
    Ok(Json(budgets))
}

async fn upsert_budget(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(mut budget): Json<NewBudget>,
) -> ApiResult<Json<Budget>> {
    budget.user_id = user_id;
    let saved = state.budget_service.upsert_budget(budget).await?;
    Ok(Json(saved))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<StatusCode> {
    state.budget_service.delete_budget(&id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(get_budgets).put(upsert_budget))
        .route("/budgets/{id}", delete(delete_budget))
}
