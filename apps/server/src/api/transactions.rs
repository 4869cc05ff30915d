use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::UserId;
use crate::{error::ApiResult, main_lib::AppState};
use ledgerly_core::transactions::{
    Category, NewTransaction, Transaction, TransactionPage, TransactionQuery, TransactionType,
    TransactionUpdate,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    #[serde(rename = "type")]
    transaction_type: Option<TransactionType>,
    category: Option<Category>,
    page: Option<i64>,
    page_size: Option<i64>,
}

async fn search_transactions(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<TransactionPage>> {
    let query = TransactionQuery {
        start: params.start,
        end: params.end,
        transaction_type: params.transaction_type,
        category: params.category,
    };
    let page = state.transaction_service.search_transactions(
        &user_id,
        &query,
        params.page,
        params.page_size,
    )?;
    Ok(Json(page))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(mut payload): Json<NewTransaction>,
) -> ApiResult<Json<Transaction>> {
    payload.user_id = user_id;
    let created = state.transaction_service.create_transaction(payload).await?;
    Ok(Json(created))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Transaction>> {
    let transaction = state.transaction_service.get_transaction(&id, &user_id)?;
    Ok(Json(transaction))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(mut payload): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    payload.id = id;
    payload.user_id = user_id;
    let updated = state.transaction_service.update_transaction(payload).await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Transaction>> {
    let deleted = state
        .transaction_service
        .delete_transaction(&id, &user_id)
        .await?;
    Ok(Json(deleted))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(search_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
