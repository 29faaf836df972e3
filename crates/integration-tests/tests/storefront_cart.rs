//! Integration tests for the storefront catalog and cart.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use luxe_integration_tests::{MockBackend, client, spawn_storefront};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal as string")).expect("valid decimal")
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> reqwest::Response {
    client
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("Request failed")
}

#[tokio::test]
async fn test_catalog_lists_only_active_products() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    let body: Value = client
        .get(format!("{base}/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["source"], "backend");
    assert_eq!(body["total"], 3);
    let ids: Vec<i64> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert!(!ids.contains(&4));

    let resp = client.get(format!("{base}/products/4")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Blank brand falls back to the house brand
    let tote: Value = client
        .get(format!("{base}/products/3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tote["brand"], "LUXE");
}

#[tokio::test]
async fn test_catalog_falls_back_when_backend_is_down() {
    let backend = MockBackend::start().await;
    backend.state.set_lists_down(true);
    let base = spawn_storefront(&backend).await;

    let body: Value = client()
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["catalog"], "fallback");
    assert_eq!(body["products"], 8);
}

#[tokio::test]
async fn test_add_merges_same_variant_and_totals() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    let resp = post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 1, "size": "M", "color": "white" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "added");
    assert_eq!(body["notice"]["title"], "Added to cart");

    let body: Value = post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 1, "size": "M", "color": "white", "quantity": 2 }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(body["outcome"], "updated");
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["notice"]["title"], "Item updated in cart");

    // Different color is a separate line
    post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 1, "size": "M", "color": "black" }),
    )
    .await;
    // No sizes offered, so any size is accepted
    post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 3, "size": "", "color": "beige" }),
    )
    .await;

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["lines"].as_array().unwrap().len(), 3);
    assert_eq!(cart["item_count"], 5);
    // 4 x 120 + 45.50
    assert_eq!(decimal(&cart["subtotal"]), Decimal::from_str("525.50").unwrap());
}

#[tokio::test]
async fn test_add_rejects_unknown_product_and_variant() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    let resp = post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 99, "size": "M", "color": "white" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 2, "size": "XS", "color": "blue" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 2, "size": "M", "color": "blue", "quantity": 0 }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_remove_lines() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    for (size, color) in [("M", "white"), ("L", "white"), ("S", "black")] {
        post_json(
            &client,
            format!("{base}/cart/add"),
            json!({ "product_id": 1, "size": size, "color": color }),
        )
        .await;
    }
    post_json(
        &client,
        format!("{base}/cart/add"),
        json!({ "product_id": 2, "size": "L", "color": "blue" }),
    )
    .await;

    // Only the addressed variant changes
    let cart: Value = post_json(
        &client,
        format!("{base}/cart/update"),
        json!({ "product_id": 1, "size": "L", "color": "white", "quantity": 4 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let quantities: Vec<(String, i64)> = cart["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| {
            (
                format!("{}/{}/{}", l["product_id"], l["size"].as_str().unwrap(), l["color"].as_str().unwrap()),
                l["quantity"].as_i64().unwrap(),
            )
        })
        .collect();
    assert!(quantities.contains(&("1/L/white".to_string(), 4)));
    assert!(quantities.contains(&("1/M/white".to_string(), 1)));

    // Zero removes the line
    let cart: Value = post_json(
        &client,
        format!("{base}/cart/update"),
        json!({ "product_id": 1, "size": "S", "color": "black", "quantity": 0 }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(cart["lines"].as_array().unwrap().len(), 3);

    let resp = post_json(
        &client,
        format!("{base}/cart/update"),
        json!({ "product_id": 1, "size": "XL", "color": "white", "quantity": 1 }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Product-wide removal
    let cart: Value = post_json(&client, format!("{base}/cart/remove"), json!({ "product_id": 1 }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["product_id"], 2);

    let cart: Value = client
        .delete(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let alice = client();
    let bob = client();

    post_json(
        &alice,
        format!("{base}/cart/add"),
        json!({ "product_id": 2, "size": "M", "color": "blue" }),
    )
    .await;

    let cart: Value = bob
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], 0);
}
