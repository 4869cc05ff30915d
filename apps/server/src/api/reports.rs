use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::UserId;
use crate::{error::ApiResult, main_lib::AppState};
use ledgerly_core::reports::{CategoryTotal, ExportFormat, Report, ReportRequest};

#[derive(Debug, Deserialize)]
struct MonthYear {
    month: Option<u32>,
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ExportParams {
    format: Option<String>,
}

async fn list_reports(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Vec<Report>>> {
    let reports = state.report_service.list_reports(&user_id)?;
    Ok(Json(reports))
}

async fn create_report(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Json(request): Json<ReportRequest>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    let report = state.report_service.create_report(&user_id, request).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn get_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Report>> {
    let report = state.report_service.get_report(&id, &user_id)?;
    Ok(Json(report))
}

async fn update_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Report>> {
    let report = state.report_service.update_report(&id, &user_id).await?;
    Ok(Json(report))
}

async fn delete_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<StatusCode> {
    state.report_service.delete_report(&id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<ExportParams>,
) -> ApiResult<impl IntoResponse> {
    let format = match params.format.as_deref() {
        Some(value) => ExportFormat::from_str(value)?,
        None => ExportFormat::Pdf,
    };
    let bytes = state.report_service.export_report(&id, format, &user_id)?;
    let disposition = format!(
        "attachment; filename=\"report-{}.{}\"",
        id,
        format.extension()
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

async fn top_categories(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<MonthYear>,
) -> ApiResult<Json<Vec<CategoryTotal>>> {
    let totals = state
        .report_service
        .top_categories(&user_id, params.month, params.year)?;
    Ok(Json(totals))
}

async fn category_charts(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<MonthYear>,
) -> ApiResult<Json<Vec<CategoryTotal>>> {
    let totals = state
        .report_service
        .category_charts(&user_id, params.month, params.year)?;
    Ok(Json(totals))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(list_reports).post(create_report))
        .route("/reports/top-categories", get(top_categories))
        .route("/reports/category-charts", get(category_charts))
        .route(
            "/reports/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route("/reports/{id}/export", get(export_report))
}
