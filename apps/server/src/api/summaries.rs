use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use super::UserId;
use crate::{error::ApiResult, main_lib::AppState};
use ledgerly_core::summaries::{DailySummary, MonthlyCategorySummary, MonthlySummary, ResyncResult};

#[derive(Debug, Deserialize)]
struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct YearMonth {
    year: Option<i32>,
    month: Option<u32>,
}

fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| Utc::now().year())
}

async fn get_daily(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(window): Query<DateWindow>,
) -> ApiResult<Json<Vec<DailySummary>>> {
    let rows = state
        .summary_service
        .get_daily_summaries(&user_id, window.start, window.end)?;
    Ok(Json(rows))
}

async fn get_monthly(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<YearMonth>,
) -> ApiResult<Json<Vec<MonthlySummary>>> {
    let rows = state
        .summary_service
        .get_monthly_summaries(&user_id, year_or_current(params.year))?;
    Ok(Json(rows))
}

async fn get_categories(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<YearMonth>,
) -> ApiResult<Json<Vec<MonthlyCategorySummary>>> {
    let rows = state.summary_service.get_category_summaries(
        &user_id,
        year_or_current(params.year),
        params.month,
    )?;
    Ok(Json(rows))
}

async fn resync(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(window): Json<DateWindow>,
) -> ApiResult<Json<ResyncResult>> {
    let result = state
        .summary_service
        .resync_user(&user_id, window.start, window.end)
        .await?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/summaries/daily", get(get_daily))
        .route("/summaries/monthly", get(get_monthly))
        .route("/summaries/categories", get(get_categories))
        .route("/summaries/resync", post(resync))
}
