//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`
//! over an in-memory database. No port is bound.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_server::{app, AppState};
use dukkan_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    app(AppState { db })
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

async fn create_product(app: &Router, barcode: &str, price_kurus: i64, stock: i64) {
    let (status, _) = send(
        app,
        post(
            "/api/products",
            json!({
                "barcode": barcode,
                "name": "Süt 1L",
                "price_kurus": price_kurus,
                "stock": stock,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn create_customer(app: &Router, name: &str) -> String {
    let (status, body) = send(app, post("/api/customers", json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn product_scan_path_roundtrip() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1500, 5).await;

    let (status, body) = send(&app, get("/api/products/8690000000001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Süt 1L");
    assert_eq!(body["price_kurus"], 1500);

    let (status, body) = send(&app, get("/api/products/0000000000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_barcode_is_a_validation_error() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1500, 5).await;

    let (status, body) = send(
        &app,
        post(
            "/api/products",
            json!({ "barcode": "8690000000001", "name": "Başka", "price_kurus": 100 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn oversell_returns_400_and_leaves_stock_alone() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1500, 3).await;

    let (status, body) = send(
        &app,
        post(
            "/api/sales",
            json!({ "items": [{ "barcode": "8690000000001", "quantity": 4 }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (_, product) = send(&app, get("/api/products/8690000000001")).await;
    assert_eq!(product["stock"], 3);
}

#[tokio::test]
async fn credit_sale_then_payment_settles_debt() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1000, 10).await;
    let customer = create_customer(&app, "Ahmet Usta").await;

    let (status, sale) = send(
        &app,
        post(
            "/api/sales",
            json!({
                "customer_id": customer,
                "items": [{ "barcode": "8690000000001", "quantity": 1 }],
                "is_debt": true,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["debt"]["amount_kurus"], 1000);
    assert_eq!(sale["debt"]["description"], "1 adet Süt 1L");

    // Overshooting payment: 1000 allocated, 500 reported back.
    let (status, payment) = send(
        &app,
        post(
            "/api/payments",
            json!({ "customer_id": customer, "amount_kurus": 1500 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["unallocated_kurus"], 500);
    assert_eq!(payment["allocations"][0]["applied_kurus"], 1000);
    assert_eq!(payment["allocations"][0]["is_paid"], true);

    let (_, debts) = send(
        &app,
        get(&format!("/api/debts?customer_id={}", customer)),
    )
    .await;
    assert_eq!(debts[0]["is_paid"], true);
}

#[tokio::test]
async fn refund_exceeding_debt_is_rejected() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1000, 10).await;
    let customer = create_customer(&app, "Ahmet Usta").await;

    let (_, sale) = send(
        &app,
        post(
            "/api/sales",
            json!({
                "customer_id": customer,
                "items": [{ "barcode": "8690000000001", "quantity": 1 }],
                "is_debt": true,
            }),
        ),
    )
    .await;
    let debt_id = sale["debt"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post(
            "/api/refunds",
            json!({
                "debt_id": debt_id,
                "barcode": "8690000000001",
                "quantity": 1,
                "refund_kurus": 1200,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "REFUND_EXCEEDS_DEBT");
}

#[tokio::test]
async fn closed_sub_customer_reopen_returns_400() {
    let app = test_app().await;
    let customer = create_customer(&app, "Ahmet Usta").await;

    let (status, sub) = send(
        &app,
        post(
            &format!("/api/customers/{}/sub-customers", customer),
            json!({ "name": "Şantiye A" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sub_id = sub["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        patch(
            &format!("/api/sub-customers/{}", sub_id),
            json!({ "status": "inactive" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        patch(
            &format!("/api/sub-customers/{}", sub_id),
            json!({ "status": "active" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ACCOUNT_CLOSED");
    assert!(body["error"].as_str().unwrap().contains("tekrar açılamaz"));
}

#[tokio::test]
async fn rejected_reopen_does_not_apply_the_rename() {
    let app = test_app().await;
    let customer = create_customer(&app, "Ahmet Usta").await;

    let (status, sub) = send(
        &app,
        post(
            &format!("/api/customers/{}/sub-customers", customer),
            json!({ "name": "Şantiye A" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sub_id = sub["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        patch(
            &format!("/api/sub-customers/{}", sub_id),
            json!({ "status": "inactive" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // One PATCH carrying both a rename and the forbidden reopen: the 400
    // must leave the whole row untouched, not just the status.
    let (status, body) = send(
        &app,
        patch(
            &format!("/api/sub-customers/{}", sub_id),
            json!({ "name": "Yeni Ad", "status": "active" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ACCOUNT_CLOSED");

    let (_, subs) = send(
        &app,
        get(&format!("/api/customers/{}/sub-customers", customer)),
    )
    .await;
    assert_eq!(subs[0]["name"], "Şantiye A");
    assert_eq!(subs[0]["status"], "inactive");
}

#[tokio::test]
async fn debt_patch_null_clears_due_date_but_absent_keeps_it() {
    let app = test_app().await;
    let customer = create_customer(&app, "Ahmet Usta").await;

    let (status, debt) = send(
        &app,
        post(
            "/api/debts",
            json!({
                "customer_id": customer,
                "amount_kurus": 5000,
                "due_date": "2026-09-01",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let debt_id = debt["id"].as_str().unwrap().to_string();

    // A patch without the field leaves the date alone.
    let (status, body) = send(
        &app,
        patch(&format!("/api/debts/{}", debt_id), json!({ "amount_kurus": 4000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["due_date"], "2026-09-01");

    // An explicit null clears it.
    let (status, body) = send(
        &app,
        patch(&format!("/api/debts/{}", debt_id), json!({ "due_date": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["due_date"].is_null());
    assert_eq!(body["amount_kurus"], 4000);
}

#[tokio::test]
async fn payment_history_totals_drop_cancelled_rows() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1000, 10).await;
    let customer = create_customer(&app, "Ahmet Usta").await;

    let (status, _) = send(
        &app,
        post(
            "/api/sales",
            json!({
                "customer_id": customer,
                "items": [{ "barcode": "8690000000001", "quantity": 1 }],
                "is_debt": true,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, payment) = send(
        &app,
        post(
            "/api/payments",
            json!({ "customer_id": customer, "amount_kurus": 600 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payment_id = payment["payment"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        get(&format!("/api/payments?customer_id={}", customer)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_paid_kurus"], 600);
    assert_eq!(body["net_paid_kurus"], 600);

    let (status, cancelled) = send(&app, delete(&format!("/api/payments/{}", payment_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    // The row stays visible in the history but no longer counts.
    let (_, body) = send(
        &app,
        get(&format!("/api/payments?customer_id={}", customer)),
    )
    .await;
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_paid_kurus"], 0);
    assert_eq!(body["net_paid_kurus"], 0);
}

#[tokio::test]
async fn daily_register_summarizes_the_day() {
    let app = test_app().await;
    create_product(&app, "8690000000001", 1000, 10).await;

    let (status, _) = send(
        &app,
        post(
            "/api/sales",
            json!({ "items": [{ "barcode": "8690000000001", "quantity": 2 }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/register/daily")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sales_count"], 1);
    assert_eq!(body["cash_sales_kurus"], 2000);
    assert_eq!(body["net_kurus"], 2000);
}
