//! Integration tests for checkout: quote, payment start and confirmation.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use luxe_integration_tests::{MockBackend, client, spawn_storefront};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn shipping_form(method: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Okello",
        "email": "ada@example.com",
        "phone": "+256700000000",
        "address": "1 Kampala Rd",
        "city": "Kampala",
        "country": "Uganda",
        "shipping_method": method
    })
}

/// Put 2 x Silk Shirt (120) and 1 x Canvas Tote (45.50) in the cart.
async fn fill_cart(client: &reqwest::Client, base: &str) {
    for body in [
        json!({ "product_id": 1, "size": "M", "color": "white", "quantity": 2 }),
        json!({ "product_id": 3, "size": "", "color": "beige" }),
    ] {
        let resp = client
            .post(format!("{base}/cart/add"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

async fn begin(client: &reqwest::Client, base: &str) -> Value {
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&shipping_form("standard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn confirm(client: &reqwest::Client, base: &str, transaction_id: &str, tx_ref: &str) -> reqwest::Response {
    client
        .post(format!("{base}/checkout/confirm"))
        .json(&json!({ "transaction_id": transaction_id, "tx_ref": tx_ref }))
        .send()
        .await
        .unwrap()
}

async fn item_count(client: &reqwest::Client, base: &str) -> i64 {
    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    cart["item_count"].as_i64().unwrap()
}

#[tokio::test]
async fn test_summary_uses_backend_settings() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();
    fill_cart(&client, &base).await;

    let summary: Value = client
        .get(format!("{base}/checkout/summary?shipping=express"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(decimal(&summary["subtotal"]), Decimal::from_str("285.50").unwrap());
    // $25 express + $5 surcharge
    assert_eq!(decimal(&summary["shipping"]), Decimal::from(30));
    assert_eq!(decimal(&summary["tax"]), Decimal::from_str("28.55").unwrap());
    assert_eq!(decimal(&summary["total"]), Decimal::from_str("344.05").unwrap());
    // 344.05 x 3700 = 1,272,985
    assert_eq!(decimal(&summary["total_ugx"]), Decimal::from(1_272_985));

    // Older clients send the form field name
    let summary: Value = client
        .get(format!("{base}/checkout/summary?shipping_method=express"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(decimal(&summary["shipping"]), Decimal::from(30));

    let summary: Value = client
        .get(format!("{base}/checkout/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // $10 standard + $5 surcharge
    assert_eq!(decimal(&summary["shipping"]), Decimal::from(15));
}

#[tokio::test]
async fn test_begin_validates_cart_and_form() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&shipping_form("standard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    fill_cart(&client, &base).await;
    let mut form = shipping_form("standard");
    form["email"] = json!("not-an-email");
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn test_successful_payment_places_order_and_clears_cart() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();
    fill_cart(&client, &base).await;

    let request = begin(&client, &base).await;
    let tx_ref = request["tx_ref"].as_str().unwrap().to_string();
    assert!(tx_ref.starts_with("LUXE-"));
    assert_eq!(request["public_key"], "FLWPUBK_TEST-luxe");
    assert_eq!(request["currency"], "USD");
    // 285.50 + 15 shipping + 28.55 tax
    assert_eq!(decimal(&request["amount"]), Decimal::from_str("329.05").unwrap());
    assert_eq!(request["customer"]["name"], "Ada Okello");

    backend
        .state
        .set_payment("flw-1", "successful", &tx_ref, "329.05", "USD");
    let resp = confirm(&client, &base, "flw-1", &tx_ref).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"]["id"], 100);
    assert_eq!(body["message"], "Order LUXE-0100 placed");

    assert_eq!(item_count(&client, &base).await, 0);
    let placed = backend.state.placed_orders();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0]["items"].as_array().unwrap().len(), 2);

    // The pending payment is gone, so a replay is refused
    let resp = confirm(&client, &base, "flw-1", &tx_ref).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(backend.state.placed_orders().len(), 1);
}

#[tokio::test]
async fn test_lines_added_after_payment_start_stay_in_cart() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();
    fill_cart(&client, &base).await;

    let request = begin(&client, &base).await;
    let tx_ref = request["tx_ref"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{base}/cart/add"))
        .json(&json!({ "product_id": 2, "size": "M", "color": "blue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(item_count(&client, &base).await, 4);

    backend
        .state
        .set_payment("flw-2", "successful", &tx_ref, "329.05", "USD");
    let resp = confirm(&client, &base, "flw-2", &tx_ref).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Only the priced lines were ordered; the jacket is still waiting
    assert_eq!(backend.state.placed_orders()[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(item_count(&client, &base).await, 1);
}

#[tokio::test]
async fn test_rejected_payments_keep_the_cart() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();
    fill_cart(&client, &base).await;

    let request = begin(&client, &base).await;
    let tx_ref = request["tx_ref"].as_str().unwrap().to_string();

    backend.state.set_payment("failed", "failed", &tx_ref, "329.05", "USD");
    backend.state.set_payment("short", "successful", &tx_ref, "300.00", "USD");
    backend.state.set_payment("ugx", "successful", &tx_ref, "329.05", "UGX");
    backend.state.set_payment("other", "successful", "LUXE-0-other", "329.05", "USD");

    for transaction_id in ["failed", "short", "ugx"] {
        let resp = confirm(&client, &base, transaction_id, &tx_ref).await;
        assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED, "{transaction_id}");
    }
    // Gateway reports a different reference
    let resp = confirm(&client, &base, "other", &tx_ref).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    // Browser posts a different reference
    let resp = confirm(&client, &base, "failed", "LUXE-1-wrongref00").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    assert_eq!(item_count(&client, &base).await, 3);
    assert!(backend.state.placed_orders().is_empty());
}

#[tokio::test]
async fn test_order_failure_keeps_the_cart_for_retry() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();
    fill_cart(&client, &base).await;

    let request = begin(&client, &base).await;
    let tx_ref = request["tx_ref"].as_str().unwrap().to_string();
    backend
        .state
        .set_payment("flw-2", "successful", &tx_ref, "329.05", "USD");

    backend.state.set_order_creation_down(true);
    let resp = confirm(&client, &base, "flw-2", &tx_ref).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(item_count(&client, &base).await, 3);

    backend.state.set_order_creation_down(false);
    let resp = confirm(&client, &base, "flw-2", &tx_ref).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(item_count(&client, &base).await, 0);
}
