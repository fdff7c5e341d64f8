//! End-to-end requests through the axum router against an in-memory ledger.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mill_db::{Database, DbConfig};
use mill_server::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    create_router(AppState::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Funds the ledger with 500.00 cash and creates one supplier and category.
async fn seeded() -> (Router, String, String) {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/globals",
        Some(json!({ "capital_delta": "500.00", "cash_delta": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, supplier) = send(&app, Method::POST, "/api/suppliers", Some(json!({ "name": "Acme Traders" }))).await;
    let (_, category) = send(&app, Method::POST, "/api/categories", Some(json!({ "name": "Basmati" }))).await;

    (
        app,
        supplier["id"].as_str().unwrap().to_string(),
        category["id"].as_str().unwrap().to_string(),
    )
}

fn purchase_body(supplier_id: &str, category_id: &str, quantity: &str, unit_price: &str, payment_type: &str) -> Value {
    json!({
        "supplier_id": supplier_id,
        "category_id": category_id,
        "total_bags": 5,
        "quantity": quantity,
        "unit_price": unit_price,
        "payment_type": payment_type,
    })
}

#[tokio::test]
async fn test_health_and_payment_choices() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/payment-choices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "value": "Cash", "label": "Cash" },
            { "value": "Credit", "label": "Credit" }
        ])
    );
}

#[tokio::test]
async fn test_globals_snapshot_and_rejected_adjustment() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capital"], "0.00");
    assert_eq!(body["cash_in_hand"], "0.00");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/globals",
        Some(json!({ "capital_delta": "100.00", "cash_delta": "150.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");
    assert!(body["error"]["capital"].is_array());

    let (_, body) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(body["capital"], "0.00");
}

#[tokio::test]
async fn test_oversized_amounts_are_rejected_not_crashed() {
    let (app, supplier_id, category_id) = seeded().await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/globals",
        Some(json!({ "capital_delta": "9999999000.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Pushes capital past 9 999 999 999.99
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/globals",
        Some(json!({ "capital_delta": "1000.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["error"]["capital"][0].as_str().unwrap().contains("9999999999.99"));

    let (_, ledger) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(ledger["capital"], "9999999000.00");

    // A credit purchase whose total cannot be represented
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        Some(purchase_body(&supplier_id, &category_id, "9999999999.99", "100", "Credit")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["error"]["total_price"].is_array());

    let (_, page) = send(&app, Method::GET, "/api/purchases", None).await;
    assert_eq!(page["meta"]["total"], 0);
}

#[tokio::test]
async fn test_cash_purchase_flow() {
    let (app, supplier_id, category_id) = seeded().await;

    let (status, purchase) = send(
        &app,
        Method::POST,
        "/api/purchases",
        Some(purchase_body(&supplier_id, &category_id, "10", "50.00", "Cash")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(purchase["total_price"], "500.00");
    assert_eq!(purchase["payment_type"], "Cash");

    let (_, ledger) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(ledger["cash_in_hand"], "0.00");
    assert_eq!(ledger["munji_inventory"], "10.00");

    let id = purchase["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/purchases/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, purchase);
}

#[tokio::test]
async fn test_unfunded_purchase_is_rejected_with_field_map() {
    let (app, supplier_id, category_id) = seeded().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/purchases",
        Some(purchase_body(&supplier_id, &category_id, "11", "50.00", "Cash")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");
    assert!(body["error"]["cash_in_hand"][0].as_str().unwrap().contains("550.00"));

    let (_, page) = send(&app, Method::GET, "/api/purchases", None).await;
    assert_eq!(page["meta"]["total"], 0);
}

#[tokio::test]
async fn test_purchase_list_filters_and_pages() {
    let (app, supplier_id, category_id) = seeded().await;

    for payment_type in ["Cash", "Credit", "Credit"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/purchases",
            Some(purchase_body(&supplier_id, &category_id, "1", "10.00", payment_type)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(&app, Method::GET, "/api/purchases?payment_type=Credit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 2);

    let (_, page) = send(&app, Method::GET, "/api/purchases?page=2&per_page=2", None).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["meta"]["total_pages"], 2);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/purchases?from_date=2024-03-02&to_date=2024-03-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, body) = send(&app, Method::GET, "/api/purchases?from_date=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["query"].is_array());
}

#[tokio::test]
async fn test_purchase_update_and_delete() {
    let (app, supplier_id, category_id) = seeded().await;

    let (_, purchase) = send(
        &app,
        Method::POST,
        "/api/purchases",
        Some(purchase_body(&supplier_id, &category_id, "4", "50.00", "Cash")),
    )
    .await;
    let uri = format!("/api/purchases/{}", purchase["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(purchase_body(&supplier_id, &category_id, "2", "50.00", "Cash")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["total_price"], "100.00");

    let (_, ledger) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(ledger["cash_in_hand"], "400.00");
    assert_eq!(ledger["munji_inventory"], "2.00");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_production_beyond_inventory_is_rejected() {
    let (app, supplier_id, category_id) = seeded().await;
    send(
        &app,
        Method::POST,
        "/api/purchases",
        Some(purchase_body(&supplier_id, &category_id, "10", "50.00", "Cash")),
    )
    .await;

    let production = |quantity: &str| {
        json!({
            "quantity_produced": quantity,
            "dryer_cost": "10.00",
            "factory_cost": "20.00",
            "wastage": "0.05",
            "quality_of_rice": 0.7,
            "unit_price": "100.00",
        })
    };

    let (status, created) = send(&app, Method::POST, "/api/productions", Some(production("8"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["total_quality"], "5.60");
    assert_eq!(created["total_price"], "560.00");

    let (status, body) = send(&app, Method::POST, "/api/productions", Some(production("5"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_INVENTORY");
    assert!(body["error"]["munji_inventory"].is_array());

    let (_, ledger) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(ledger["munji_inventory"], "2.00");
    let (_, list) = send(&app, Method::GET, "/api/productions", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_expenses_and_misc_costs() {
    let (app, supplier_id, category_id) = seeded().await;
    let (_, purchase) = send(
        &app,
        Method::POST,
        "/api/purchases",
        Some(purchase_body(&supplier_id, &category_id, "1", "100.00", "Credit")),
    )
    .await;
    let purchase_id = purchase["id"].as_str().unwrap();

    let (status, expense) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({ "purchase_id": purchase_id, "title": "Transport", "amount": "75.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["amount"], "75.50");

    let (_, list) = send(&app, Method::GET, &format!("/api/expenses?purchase_id={purchase_id}"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/miscellaneous-costs",
        Some(json!({ "title": "Electricity", "amount": 24.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, ledger) = send(&app, Method::GET, "/api/globals", None).await;
    assert_eq!(ledger["cash_in_hand"], "400.00");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/miscellaneous-costs",
        Some(json!({ "title": "Generator", "amount": "400.01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");

    let (status, _) = send(&app, Method::GET, "/api/expenses/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_crud() {
    let app = app().await;

    let (status, created) = send(&app, Method::POST, "/api/categories", Some(json!({ "name": "Sella" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/categories/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, "/api/categories", Some(json!({ "name": " Sella " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CONSTRAINT_VIOLATION");
    assert!(body["error"]["name"].is_array());

    let (status, renamed) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Brown" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Brown");

    let (_, list) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_uses_error_shape() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/api/suppliers", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["error"]["body"].is_array());
}
