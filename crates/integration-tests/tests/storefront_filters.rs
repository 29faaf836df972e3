//! Integration tests for session filters and product listing.

#![allow(clippy::unwrap_used)]

use luxe_integration_tests::{MockBackend, client, spawn_storefront};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn ids(listing: &Value) -> Vec<i64> {
    listing["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

async fn get(client: &reqwest::Client, url: String) -> Value {
    client.get(url).send().await.unwrap().json().await.unwrap()
}

async fn change(client: &reqwest::Client, base: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{base}/filters"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_session_filters_shape_the_listing() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    // Default sort is newest first
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![3, 2, 1]);

    change(&client, &base, json!({ "action": "toggle_category", "value": "jackets" })).await;
    change(&client, &base, json!({ "action": "toggle_category", "value": "shirts" })).await;
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![2, 1]);

    change(&client, &base, json!({ "action": "set_sort", "sort": "price-high" })).await;
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![2, 1]);
    change(&client, &base, json!({ "action": "set_sort", "sort": "price-low" })).await;
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![1, 2]);

    // Toggling again removes the facet
    change(&client, &base, json!({ "action": "toggle_category", "value": "jackets" })).await;
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![1]);

    let state = get(&client, format!("{base}/filters")).await;
    assert_eq!(state["categories"], json!(["shirts"]));
    assert_eq!(state["sort_key"], "price-low");

    let cleared: Value = client
        .delete(format!("{base}/filters"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["categories"], json!([]));
    assert_eq!(ids(&get(&client, format!("{base}/products")).await).len(), 3);
}

#[tokio::test]
async fn test_search_and_price_range() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    change(&client, &base, json!({ "action": "set_search", "text": "ATELIER" })).await;
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![2]);

    change(&client, &base, json!({ "action": "set_search", "text": "" })).await;
    let resp = change(
        &client,
        &base,
        json!({ "action": "set_price_range", "min": "40", "max": "130" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![3, 1]);

    // An inverted range is refused and the previous range kept
    let resp = change(
        &client,
        &base,
        json!({ "action": "set_price_range", "min": "300", "max": "100" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![3, 1]);
}

#[tokio::test]
async fn test_query_overrides_session_filters() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    change(&client, &base, json!({ "action": "toggle_category", "value": "jackets" })).await;

    let listing = get(&client, format!("{base}/products?category=shirts,accessories&sort=brand-az")).await;
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["products"][0]["brand"], "LUXE");

    // Session state is untouched by the query
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![2]);

    let resp = client
        .get(format!("{base}/products?min_price=abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_size_and_color_selections_keep_the_listing() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    change(&client, &base, json!({ "action": "toggle_size", "value": "S" })).await;
    change(&client, &base, json!({ "action": "toggle_color", "value": "blue" })).await;

    let state = get(&client, format!("{base}/filters")).await;
    assert_eq!(state["sizes"], json!(["S"]));
    assert_eq!(state["colors"], json!(["blue"]));
    // The tote offers no sizes and is still listed
    assert_eq!(ids(&get(&client, format!("{base}/products")).await), vec![3, 2, 1]);
}

#[tokio::test]
async fn test_repeated_query_values_select_once() {
    let backend = MockBackend::start().await;
    let base = spawn_storefront(&backend).await;
    let client = client();

    let listing = get(&client, format!("{base}/products?category=shirts,shirts")).await;
    assert_eq!(ids(&listing), vec![1]);
}
