use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use ledgerly_server::{api::app_router, build_state, config::Config};

async fn build_test_router() -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
    };
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config))
}

async fn send(app: &Router, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap(),
        Value::String(s) => s.parse().unwrap(),
        other => panic!("not an amount: {}", other),
    }
}

#[tokio::test]
async fn healthz_works_without_user() {
    let (_tmp, app) = build_test_router().await;
    let response = send(&app, Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_without_user_header_are_rejected() {
    let (_tmp, app) = build_test_router().await;
    let response = send(&app, Method::GET, "/api/v1/transactions", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn transaction_writes_maintain_summaries() {
    let (_tmp, app) = build_test_router().await;

    for (kind, category, value) in [
        ("income", "salary", 2000),
        ("expense", "food", 50),
        ("expense", "transportation", 30),
    ] {
        let response = send(
            &app,
            Method::POST,
            "/api/v1/transactions",
            Some("u1"),
            Some(json!({
                "type": kind,
                "category": category,
                "amount": value,
                "date": "2025-01-05"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let daily = json_body(
        send(
            &app,
            Method::GET,
            "/api/v1/summaries/daily?start=2025-01-05&end=2025-01-05",
            Some("u1"),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(daily.as_array().unwrap().len(), 1);
    assert_eq!(amount(&daily[0]["totalIncome"]), 2000.0);
    assert_eq!(amount(&daily[0]["totalExpense"]), 80.0);

    let other_user = json_body(
        send(
            &app,
            Method::GET,
            "/api/v1/summaries/monthly?year=2025",
            Some("u2"),
            None,
        )
        .await,
    )
    .await;
    assert!(other_user.as_array().unwrap().is_empty());

    let page = json_body(
        send(
            &app,
            Method::GET,
            "/api/v1/transactions?type=expense&pageSize=1",
            Some("u1"),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_transaction_is_a_bad_request() {
    let (_tmp, app) = build_test_router().await;
    let response = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some("u1"),
        Some(json!({
            "type": "income",
            "category": "food",
            "amount": 10,
            "date": "2025-01-05"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn report_lifecycle_over_http() {
    let (_tmp, app) = build_test_router().await;

    for (kind, category, value) in [("income", "salary", 3000), ("expense", "food", 200)] {
        send(
            &app,
            Method::POST,
            "/api/v1/transactions",
            Some("u1"),
            Some(json!({
                "type": kind,
                "category": category,
                "amount": value,
                "date": "2025-01-05"
            })),
        )
        .await;
    }
    let budget = send(
        &app,
        Method::PUT,
        "/api/v1/budgets",
        Some("u1"),
        Some(json!({ "category": "food", "month": 1, "year": 2025, "amount": 800 })),
    )
    .await;
    assert_eq!(budget.status(), StatusCode::OK);

    let created = send(
        &app,
        Method::POST,
        "/api/v1/reports",
        Some("u1"),
        Some(json!({ "reportType": "monthly", "month": 1, "year": 2025 })),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let report = json_body(created).await;
    let id = report["id"].as_str().unwrap().to_string();
    assert_eq!(amount(&report["data"]["summary"]["totalExpense"]), 200.0);
    assert_eq!(
        amount(&report["data"]["budgets"]["byCategory"][0]["percentageUsed"]),
        25.0
    );

    let foreign = send(&app, Method::GET, &format!("/api/v1/reports/{}", id), Some("u2"), None).await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let csv = send(
        &app,
        Method::GET,
        &format!("/api/v1/reports/{}/export?format=csv", id),
        Some("u1"),
        None,
    )
    .await;
    assert_eq!(csv.status(), StatusCode::OK);
    assert_eq!(
        csv.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = to_bytes(csv.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8(bytes.to_vec()).unwrap().contains("food,800,200,25"));

    let unsupported = send(
        &app,
        Method::GET,
        &format!("/api/v1/reports/{}/export?format=xlsx", id),
        Some("u1"),
        None,
    )
    .await;
    assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);

    let top = json_body(
        send(
            &app,
            Method::GET,
            "/api/v1/reports/top-categories?month=1&year=2025",
            Some("u1"),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(top[0]["category"], "food");

    let deleted = send(&app, Method::DELETE, &format!("/api/v1/reports/{}", id), Some("u1"), None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let list = json_body(send(&app, Method::GET, "/api/v1/reports", Some("u1"), None).await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn savings_goals_filter_by_due_date() {
    let (_tmp, app) = build_test_router().await;
    for (name, due) in [
        ("bike", json!("2024-05-01")),
        ("house", json!("2030-01-01")),
        ("someday", Value::Null),
    ] {
        let response = send(
            &app,
            Method::POST,
            "/api/v1/savings-goals",
            Some("u1"),
            Some(json!({
                "name": name,
                "targetAmount": 1000,
                "priority": "medium",
                "dueDate": due
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let all =
        json_body(send(&app, Method::GET, "/api/v1/savings-goals", Some("u1"), None).await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let upcoming = json_body(
        send(
            &app,
            Method::GET,
            "/api/v1/savings-goals?dueOnOrAfter=2025-01-01",
            Some("u1"),
            None,
        )
        .await,
    )
    .await;
    let names: Vec<&str> = upcoming
        .as_array()
        .unwrap()
        .iter()
        .map(|goal| goal["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["house", "someday"]);
}

#[tokio::test]
async fn out_of_range_page_is_a_bad_request() {
    let (_tmp, app) = build_test_router().await;
    let response = send(
        &app,
        Method::GET,
        "/api/v1/transactions?page=9223372036854775807",
        Some("u1"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
