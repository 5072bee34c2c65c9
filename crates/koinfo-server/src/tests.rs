//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn setup_test_app() -> Router {
    create_router(Ledger::in_memory(), None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send one request and return the status with the decoded JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(serde_json::to_string(&value).unwrap()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, get_body_json(response).await)
}

async fn get_data(app: &Router) -> Value {
    let (status, data) = send(app, "GET", "/api/data", None).await;
    assert_eq!(status, StatusCode::OK);
    data
}

fn future_deadline() -> String {
    (koinfo_core::today() + Duration::days(365))
        .format("%Y-%m-%d")
        .to_string()
}

fn category_named<'a>(data: &'a Value, name: &str) -> &'a Value {
    data["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap()
}

fn debt_balance(data: &Value, id: &str) -> f64 {
    data["debts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"] == id)
        .unwrap()["balance"]
        .as_f64()
        .unwrap()
}

fn goal_current(data: &Value, id: &str) -> f64 {
    data["goals"]
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["id"] == id)
        .unwrap()["current"]
        .as_f64()
        .unwrap()
}

// ========== Dataset API Tests ==========

#[tokio::test]
async fn test_get_data_returns_seed() {
    let app = setup_test_app();

    let data = get_data(&app).await;
    let categories = data["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(category_named(&data, "Salary")["type"], "income");
    assert_eq!(category_named(&data, "Groceries")["type"], "expense");
    assert_eq!(category_named(&data, "Investments")["type"], "saving");
    assert_eq!(data["open_balance"], 0.0);
    assert!(data["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_update_open_balance() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/api/open_balance",
        Some(json!({"open_balance": 1250.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["open_balance"], 1250.5);

    let data = get_data(&app).await;
    assert_eq!(data["open_balance"], 1250.5);
}

#[tokio::test]
async fn test_update_open_balance_requires_number() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/api/open_balance",
        Some(json!({"open_balance": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_reset_data() {
    let app = setup_test_app();

    send(
        &app,
        "POST",
        "/api/category",
        Some(json!({"name": "Rent", "type": "expense"})),
    )
    .await;
    send(
        &app,
        "PUT",
        "/api/open_balance",
        Some(json!({"open_balance": 10.0})),
    )
    .await;

    let (status, json) = send(&app, "POST", "/api/reset_data", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["categories"].as_array().unwrap().len(), 3);
    assert_eq!(json["open_balance"], 0.0);

    let data = get_data(&app).await;
    assert_eq!(data, json);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/category")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

// ========== Category API Tests ==========

#[tokio::test]
async fn test_create_category() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/category",
        Some(json!({"name": "  Rent ", "type": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Rent");
    assert_eq!(json["type"], "expense");
    assert_eq!(json["deleted"], false);
    assert!(json["id"].is_string());
}

#[tokio::test]
async fn test_create_category_defaults_to_expense() {
    let app = setup_test_app();

    let (status, json) = send(&app, "POST", "/api/category", Some(json!({"name": "Misc"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["type"], "expense");
}

#[tokio::test]
async fn test_create_category_requires_name() {
    let app = setup_test_app();

    let (status, json) = send(&app, "POST", "/api/category", Some(json!({"name": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Category name required");
}

#[tokio::test]
async fn test_create_category_rejects_unknown_type() {
    let app = setup_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/category",
        Some(json!({"name": "Gifts", "type": "gift"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_duplicate_category_conflicts() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/category",
        Some(json!({"name": "GROCERIES", "type": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_update_category() {
    let app = setup_test_app();
    let data = get_data(&app).await;
    let id = category_named(&data, "Groceries")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/category/{}", id),
        Some(json!({"name": "Food"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Food");
    assert_eq!(json["type"], "expense");
}

#[tokio::test]
async fn test_update_unknown_category_not_found() {
    let app = setup_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/api/category/missing",
        Some(json!({"name": "Food"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unused_category_removes_it() {
    let app = setup_test_app();
    let data = get_data(&app).await;
    let id = category_named(&data, "Salary")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, json) = send(&app, "DELETE", &format!("/api/category/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);

    let data = get_data(&app).await;
    assert_eq!(data["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_referenced_category_soft_deletes() {
    let app = setup_test_app();
    let data = get_data(&app).await;
    let id = category_named(&data, "Groceries")["id"]
        .as_str()
        .unwrap()
        .to_string();

    send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": id, "amount": 42.0, "date": "2024-05-01"})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/api/category/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let data = get_data(&app).await;
    let groceries = category_named(&data, "Groceries");
    assert_eq!(groceries["deleted"], true);

    // The name is free again for a new active category
    let (status, _) = send(
        &app,
        "POST",
        "/api/category",
        Some(json!({"name": "Groceries", "type": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_linked_category_conflicts() {
    let app = setup_test_app();

    let (_, debt) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Card", "balance": 100.0, "kind": "payable"})),
    )
    .await;
    let linked = debt["linked_category_id"].as_str().unwrap();

    let (status, json) = send(&app, "DELETE", &format!("/api/category/{}", linked), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("linked"));
}

// ========== Debt API Tests ==========

#[tokio::test]
async fn test_create_debt_creates_linked_category() {
    let app = setup_test_app();

    let (status, debt) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Car Loan", "balance": 5000.0, "kind": "payable"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(debt["balance"], 5000.0);
    assert_eq!(debt["kind"], "payable");

    let data = get_data(&app).await;
    let linked = category_named(&data, "Car Loan - Debt");
    assert_eq!(linked["id"], debt["linked_category_id"]);
    assert_eq!(linked["type"], "expense");
}

#[tokio::test]
async fn test_receivable_debt_links_income_category() {
    let app = setup_test_app();

    let (_, debt) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Loan to Sam", "balance": 200.0, "kind": "receivable"})),
    )
    .await;

    let data = get_data(&app).await;
    let linked = category_named(&data, "Loan to Sam - Debt");
    assert_eq!(linked["id"], debt["linked_category_id"]);
    assert_eq!(linked["type"], "income");
}

#[tokio::test]
async fn test_create_duplicate_debt_conflicts() {
    let app = setup_test_app();

    send(&app, "POST", "/api/debt", Some(json!({"name": "Card"}))).await;
    let (status, _) = send(&app, "POST", "/api/debt", Some(json!({"name": " card "}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_debt_renames_linked_category() {
    let app = setup_test_app();

    let (_, debt) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Card", "balance": 100.0})),
    )
    .await;
    let id = debt["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/debt/{}", id),
        Some(json!({"name": "Visa"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Visa");
    assert_eq!(updated["balance"], 100.0);
    assert_eq!(updated["linked_category_id"], debt["linked_category_id"]);

    let data = get_data(&app).await;
    assert_eq!(
        category_named(&data, "Visa - Debt")["id"],
        debt["linked_category_id"]
    );
}

#[tokio::test]
async fn test_delete_debt() {
    let app = setup_test_app();

    let (_, debt) = send(&app, "POST", "/api/debt", Some(json!({"name": "Card"}))).await;
    let id = debt["id"].as_str().unwrap();

    let (status, json) = send(&app, "DELETE", &format!("/api/debt/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);

    let data = get_data(&app).await;
    assert!(data["debts"].as_array().unwrap().is_empty());
    assert_eq!(category_named(&data, "Card - Debt")["deleted"], true);

    let (status, _) = send(&app, "DELETE", &format!("/api/debt/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_debt_payment_scenario() {
    let app = setup_test_app();

    let (_, debt) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Card", "balance": 100.0, "kind": "payable"})),
    )
    .await;
    let debt_id = debt["id"].as_str().unwrap();

    let (status, tx) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({
            "category_id": debt["linked_category_id"],
            "amount": 30.0,
            "debt_claim": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["type"], "expense");
    assert_eq!(debt_balance(&get_data(&app).await, debt_id), 70.0);

    let tx_id = tx["id"].as_str().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/api/transaction/{}", tx_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(debt_balance(&get_data(&app).await, debt_id), 100.0);
}

// ========== Goal API Tests ==========

#[tokio::test]
async fn test_create_goal() {
    let app = setup_test_app();
    let deadline = future_deadline();

    let (status, goal) = send(
        &app,
        "POST",
        "/api/goal",
        Some(json!({"name": "Trip", "target": 500.0, "deadline": deadline, "current": 300.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["name"], "Trip");
    assert_eq!(goal["current"], 0.0);
    assert_eq!(goal["deadline"], deadline);

    let data = get_data(&app).await;
    let linked = category_named(&data, "Trip - Goal");
    assert_eq!(linked["id"], goal["linked_category_id"]);
    assert_eq!(linked["type"], "saving");
}

#[tokio::test]
async fn test_create_goal_rejects_past_deadline() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/goal",
        Some(json!({"name": "Trip", "target": 500.0, "deadline": "2000-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Deadline must be after today");

    let (status, json) = send(
        &app,
        "POST",
        "/api/goal",
        Some(json!({"name": "Trip", "target": 500.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Deadline required");

    let data = get_data(&app).await;
    assert!(data["goals"].as_array().unwrap().is_empty());
    assert_eq!(data["categories"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_goal_deposit_scenario() {
    let app = setup_test_app();

    let (_, goal) = send(
        &app,
        "POST",
        "/api/goal",
        Some(json!({"name": "Trip", "target": 500.0, "deadline": future_deadline()})),
    )
    .await;
    let goal_id = goal["id"].as_str().unwrap();
    let linked = goal["linked_category_id"].clone();

    let (_, deposit) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": linked, "amount": 50.0})),
    )
    .await;
    assert_eq!(deposit["type"], "saving");
    assert_eq!(goal_current(&get_data(&app).await, goal_id), 50.0);

    let deposit_id = deposit["id"].as_str().unwrap();
    let (status, edited) = send(
        &app,
        "PUT",
        &format!("/api/transaction/{}", deposit_id),
        Some(json!({"amount": 80.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["amount"], 80.0);
    assert_eq!(goal_current(&get_data(&app).await, goal_id), 80.0);

    send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": linked, "amount": 20.0, "goal_withdrawal": true})),
    )
    .await;
    assert_eq!(goal_current(&get_data(&app).await, goal_id), 60.0);
}

#[tokio::test]
async fn test_update_goal_keeps_progress() {
    let app = setup_test_app();

    let (_, goal) = send(
        &app,
        "POST",
        "/api/goal",
        Some(json!({"name": "Trip", "target": 500.0, "deadline": future_deadline()})),
    )
    .await;
    let goal_id = goal["id"].as_str().unwrap();
    send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": goal["linked_category_id"], "amount": 75.0})),
    )
    .await;

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/goal/{}", goal_id),
        Some(json!({"name": "Japan", "target": 900.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["target"], 900.0);
    assert_eq!(updated["current"], 75.0);

    let data = get_data(&app).await;
    assert_eq!(
        category_named(&data, "Japan - Goal")["id"],
        goal["linked_category_id"]
    );
}

#[tokio::test]
async fn test_delete_goal() {
    let app = setup_test_app();

    let (_, goal) = send(
        &app,
        "POST",
        "/api/goal",
        Some(json!({"name": "Trip", "target": 500.0, "deadline": future_deadline()})),
    )
    .await;
    let goal_id = goal["id"].as_str().unwrap();

    let (status, json) = send(&app, "DELETE", &format!("/api/goal/{}", goal_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);

    let data = get_data(&app).await;
    assert!(data["goals"].as_array().unwrap().is_empty());
    assert_eq!(category_named(&data, "Trip - Goal")["deleted"], true);
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_create_transaction_stamps_type() {
    let app = setup_test_app();
    let data = get_data(&app).await;
    let salary = category_named(&data, "Salary")["id"].clone();

    let (status, tx) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": salary, "amount": 3000.0, "date": "2024-05-31", "note": "May"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["type"], "income");
    assert_eq!(tx["date"], "2024-05-31");
    assert_eq!(tx["note"], "May");
    assert_eq!(tx["use_open_balance"], false);
}

#[tokio::test]
async fn test_create_transaction_unknown_category() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": "nope", "amount": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid category_id"));
}

#[tokio::test]
async fn test_create_transaction_bad_date() {
    let app = setup_test_app();
    let data = get_data(&app).await;
    let groceries = category_named(&data, "Groceries")["id"].clone();

    let (status, _) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": groceries, "amount": 10.0, "date": "31/05/2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let data = get_data(&app).await;
    assert!(data["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_move_transaction_between_debts() {
    let app = setup_test_app();

    let (_, card) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Card", "balance": 100.0})),
    )
    .await;
    let (_, loan) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Loan", "balance": 500.0})),
    )
    .await;

    let (_, tx) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({"category_id": card["linked_category_id"], "amount": 40.0})),
    )
    .await;
    let tx_id = tx["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/transaction/{}", tx_id),
        Some(json!({"category_id": loan["linked_category_id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = get_data(&app).await;
    assert_eq!(debt_balance(&data, card["id"].as_str().unwrap()), 100.0);
    assert_eq!(debt_balance(&data, loan["id"].as_str().unwrap()), 460.0);
}

#[tokio::test]
async fn test_overflowing_claim_rejected() {
    let app = setup_test_app();

    let (_, loan) = send(
        &app,
        "POST",
        "/api/debt",
        Some(json!({"name": "Loan", "balance": 1.7e308, "kind": "receivable"})),
    )
    .await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/transaction",
        Some(json!({
            "category_id": loan["linked_category_id"],
            "amount": 1.7e308,
            "debt_claim": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let data = get_data(&app).await;
    assert_eq!(debt_balance(&data, loan["id"].as_str().unwrap()), 1.7e308);
    assert!(data["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_unknown_transaction_not_found() {
    let app = setup_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/api/transaction/missing",
        Some(json!({"amount": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/transaction/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========== Config Tests ==========

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" http://localhost:5173, ,https://example.com "),
        vec![
            "http://localhost:5173".to_string(),
            "https://example.com".to_string()
        ]
    );
    assert!(parse_origins("").is_empty());
}

#[test]
fn test_core_errors_map_to_status() {
    let status = |err: koinfo_core::Error| AppError::from(err).into_response().status();

    assert_eq!(
        status(koinfo_core::Error::Validation("bad".to_string())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status(koinfo_core::Error::NotFound("debt x".to_string())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status(koinfo_core::Error::LinkedEntity("x".to_string())),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status(koinfo_core::Error::Storage("disk".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
