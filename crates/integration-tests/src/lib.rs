//! Integration tests for LUXE.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luxe-integration-tests
//! ```
//!
//! Each test starts an in-process mock of the store REST backend and the
//! real storefront or admin router, all on ephemeral loopback ports, and
//! drives them over HTTP with a cookie-keeping client.
//!
//! # Test Categories
//!
//! - `storefront_*` - Shopper API (cart, filters, checkout)
//! - `admin_*` - Admin API (auth, products, orders, settings)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Path as UrlPath, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

// =============================================================================
// Mock backend
// =============================================================================

/// A product created through the multipart endpoint.
#[derive(Debug, Clone)]
pub struct Upload {
    pub fields: BTreeMap<String, String>,
    pub image_names: Vec<String>,
}

#[derive(Default)]
struct MockData {
    products: Vec<Value>,
    orders: Vec<Value>,
    customers: Vec<Value>,
    /// Verification replies keyed by gateway transaction id.
    payments: HashMap<String, Value>,
    placed_orders: Vec<Value>,
    status_updates: Vec<(i64, String)>,
    uploads: Vec<Upload>,
    deleted_products: Vec<i64>,
    /// Every list endpoint answers 503 while set.
    lists_down: bool,
    /// `POST /orders/` answers 500 while set.
    order_creation_down: bool,
}

/// Shared, inspectable state of the mock backend.
#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<MockData>>,
}

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.inner.lock().expect("mock backend state poisoned")
    }

    /// Make every list endpoint fail.
    pub fn set_lists_down(&self, down: bool) {
        self.lock().lists_down = down;
    }

    /// Make order creation fail.
    pub fn set_order_creation_down(&self, down: bool) {
        self.lock().order_creation_down = down;
    }

    /// Register what the gateway reports for `transaction_id`.
    pub fn set_payment(&self, transaction_id: &str, status: &str, tx_ref: &str, amount: &str, currency: &str) {
        self.lock().payments.insert(
            transaction_id.to_string(),
            json!({ "status": status, "tx_ref": tx_ref, "amount": amount, "currency": currency }),
        );
    }

    /// Orders placed through `POST /orders/`.
    #[must_use]
    pub fn placed_orders(&self) -> Vec<Value> {
        self.lock().placed_orders.clone()
    }

    /// `(order id, status)` pairs received by the status endpoint.
    #[must_use]
    pub fn status_updates(&self) -> Vec<(i64, String)> {
        self.lock().status_updates.clone()
    }

    /// Multipart product uploads.
    #[must_use]
    pub fn uploads(&self) -> Vec<Upload> {
        self.lock().uploads.clone()
    }

    /// Ids passed to the product delete endpoint.
    #[must_use]
    pub fn deleted_products(&self) -> Vec<i64> {
        self.lock().deleted_products.clone()
    }

    /// Current product records.
    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        self.lock().products.clone()
    }
}

/// A running mock of the store REST backend.
pub struct MockBackend {
    /// Base URL of the API, ending in `/api/`.
    pub base_url: String,
    pub state: MockState,
}

impl MockBackend {
    /// Start a mock seeded with [`seed_products`], [`seed_orders`] and
    /// [`seed_customers`].
    pub async fn start() -> Self {
        let state = MockState::default();
        {
            let mut data = state.lock();
            data.products = seed_products();
            data.orders = seed_orders();
            data.customers = seed_customers();
        }

        let api = Router::new()
            .route("/products/", get(list_products).post(create_product))
            .route("/products/admin_list/", get(admin_list_products))
            .route("/products/{id}/", delete(delete_product))
            .route("/orders/", get(list_orders).post(place_order))
            .route("/orders/{id}/", get(get_order))
            .route("/orders/{id}/update_status/", post(update_order_status))
            .route("/customers/", get(list_customers))
            .route("/checkout-settings/", get(checkout_settings))
            .route("/payments/verify/", post(verify_payment))
            .with_state(state.clone());

        let addr = serve(Router::new().nest("/api", api)).await;
        Self {
            base_url: format!("http://{addr}/api/"),
            state,
        }
    }
}

/// Three active products and one inactive one.
#[must_use]
pub fn seed_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "Silk Shirt", "brand": "LUXE", "category": "shirts",
            "price": "120.00", "description": "Washed silk",
            "sizes": ["S", "M", "L"], "colors": ["white", "black"],
            "stock_quantity": 5, "is_active": true, "featured": true,
            "images": [{ "id": 1, "image": "/media/products/silk.jpg", "is_primary": true }]
        }),
        json!({
            "id": 2, "name": "Denim Jacket", "brand": "Atelier", "category": "jackets",
            "price": "250.00", "description": "Raw denim",
            "sizes": ["M", "L"], "colors": ["blue"],
            "stock_quantity": 2, "is_active": true, "featured": false, "images": []
        }),
        json!({
            "id": 3, "name": "Canvas Tote", "brand": "", "category": "accessories",
            "price": "45.50", "description": null,
            "sizes": [], "colors": ["beige"],
            "stock_quantity": 10, "is_active": true, "featured": false, "images": []
        }),
        json!({
            "id": 4, "name": "Unreleased Coat", "brand": "LUXE", "category": "jackets",
            "price": "400.00", "sizes": [], "colors": [],
            "stock_quantity": 0, "is_active": false, "featured": false, "images": []
        }),
    ]
}

/// One pending, one delivered and one cancelled order.
#[must_use]
pub fn seed_orders() -> Vec<Value> {
    vec![
        json!({
            "id": 10, "order_number": "LUXE-0010", "customer_name": "Ada Okello",
            "status": "pending", "payment_status": "paid", "total_amount": "150.00",
            "shipping_address": "1 Kampala Rd", "shipping_city": "Kampala",
            "shipping_country": "Uganda", "created_at": "2026-03-01T10:00:00Z"
        }),
        json!({
            "id": 11, "order_number": "LUXE-0011", "customer_name": "Ben Mugisha",
            "status": "delivered", "payment_status": "paid", "total_amount": "300.00",
            "shipping_address": "2 Jinja Rd", "shipping_city": "Jinja",
            "shipping_country": "Uganda", "created_at": "2026-03-02T10:00:00Z"
        }),
        json!({
            "id": 12, "order_number": "LUXE-0012", "customer_name": "Cleo Nansubuga",
            "status": "cancelled", "payment_status": "refunded", "total_amount": "80.00",
            "shipping_address": "3 Gulu Rd", "shipping_city": "Gulu",
            "shipping_country": "Uganda", "created_at": "2026-03-03T10:00:00Z"
        }),
    ]
}

/// Two customers.
#[must_use]
pub fn seed_customers() -> Vec<Value> {
    vec![
        json!({ "id": 1, "email": "ada@example.com", "first_name": "Ada", "last_name": "Okello" }),
        json!({ "id": 2, "email": "ben@example.com", "first_name": "Ben", "last_name": "Mugisha" }),
    ]
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "backend down").into_response()
}

fn next_id(records: &[Value]) -> i64 {
    records
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1
}

async fn list_products(State(state): State<MockState>) -> Response {
    let data = state.lock();
    if data.lists_down {
        return unavailable();
    }
    Json(Value::Array(data.products.clone())).into_response()
}

/// Paginated shape, so both list encodings are exercised.
async fn admin_list_products(State(state): State<MockState>) -> Response {
    let data = state.lock();
    if data.lists_down {
        return unavailable();
    }
    Json(json!({ "count": data.products.len(), "results": data.products })).into_response()
}

async fn create_product(State(state): State<MockState>, request: Request) -> Response {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let mut product = if is_multipart {
        let mut multipart = match Multipart::from_request(request, &()).await {
            Ok(multipart) => multipart,
            Err(rejection) => return rejection.into_response(),
        };
        let mut upload = Upload {
            fields: BTreeMap::new(),
            image_names: Vec::new(),
        };
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            if name == "images" {
                upload
                    .image_names
                    .push(field.file_name().unwrap_or_default().to_string());
                let _ = field.bytes().await;
            } else {
                let text = field.text().await.unwrap_or_default();
                upload.fields.insert(name, text);
            }
        }
        let product = product_from_upload(&upload);
        state.lock().uploads.push(upload);
        product
    } else {
        match Json::<Value>::from_request(request, &()).await {
            Ok(Json(body)) => body,
            Err(rejection) => return rejection.into_response(),
        }
    };

    let mut data = state.lock();
    product["id"] = json!(next_id(&data.products));
    data.products.push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

fn product_from_upload(upload: &Upload) -> Value {
    let mut product = serde_json::Map::new();
    for (key, value) in &upload.fields {
        let value = match key.as_str() {
            "sizes" | "colors" | "tags" => serde_json::from_str(value).unwrap_or_else(|_| json!([])),
            "is_active" | "is_in_stock" | "featured" => json!(value == "true"),
            "stock_quantity" => json!(value.parse::<u64>().unwrap_or_default()),
            _ => json!(value),
        };
        product.insert(key.clone(), value);
    }
    let images: Vec<Value> = upload
        .image_names
        .iter()
        .map(|name| json!({ "image": format!("/media/products/{name}") }))
        .collect();
    product.insert("images".to_string(), Value::Array(images));
    Value::Object(product)
}

async fn delete_product(State(state): State<MockState>, UrlPath(id): UrlPath<i64>) -> StatusCode {
    let mut data = state.lock();
    let before = data.products.len();
    data.products.retain(|p| p["id"].as_i64() != Some(id));
    if data.products.len() == before {
        return StatusCode::NOT_FOUND;
    }
    data.deleted_products.push(id);
    StatusCode::NO_CONTENT
}

async fn list_orders(State(state): State<MockState>) -> Response {
    let data = state.lock();
    if data.lists_down {
        return unavailable();
    }
    Json(Value::Array(data.orders.clone())).into_response()
}

async fn get_order(State(state): State<MockState>, UrlPath(id): UrlPath<i64>) -> Response {
    let data = state.lock();
    data.orders
        .iter()
        .find(|o| o["id"].as_i64() == Some(id))
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |order| Json(order.clone()).into_response(),
        )
}

async fn place_order(State(state): State<MockState>, Json(order): Json<Value>) -> Response {
    let mut data = state.lock();
    if data.order_creation_down {
        return (StatusCode::INTERNAL_SERVER_ERROR, "order service down").into_response();
    }
    let id = 100 + i64::try_from(data.placed_orders.len()).unwrap_or_default();
    data.placed_orders.push(order);
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "order_number": format!("LUXE-{id:04}") })),
    )
        .into_response()
}

async fn update_order_status(
    State(state): State<MockState>,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<Value>,
) -> Response {
    let status = body["status"].as_str().unwrap_or_default().to_string();
    let mut data = state.lock();
    data.status_updates.push((id, status.clone()));
    let Some(order) = data.orders.iter_mut().find(|o| o["id"].as_i64() == Some(id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    order["status"] = json!(status);
    Json(order.clone()).into_response()
}

async fn list_customers(State(state): State<MockState>) -> Response {
    let data = state.lock();
    if data.lists_down {
        return unavailable();
    }
    Json(Value::Array(data.customers.clone())).into_response()
}

/// Shipping surcharge $5, tax 10% (as a percentage), 3700 UGX per USD.
async fn checkout_settings() -> Json<Value> {
    Json(json!({ "shippingRate": "5.00", "taxRate": "10", "usdToUgxRate": "3700" }))
}

async fn verify_payment(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let transaction_id = body["transaction_id"].as_str().unwrap_or_default();
    state.lock().payments.get(transaction_id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |verification| Json(verification.clone()).into_response(),
    )
}

// =============================================================================
// Servers under test
// =============================================================================

/// Serve `router` on an ephemeral loopback port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    addr
}

/// Start the storefront against `backend` with the catalog already loaded.
pub async fn spawn_storefront(backend: &MockBackend) -> String {
    use luxe_storefront::config::{BackendConfig, PaymentConfig, StorefrontConfig};

    let mut backend_config = BackendConfig::new(&backend.base_url).expect("Invalid mock URL");
    backend_config.timeout = Duration::from_secs(5);
    let config = StorefrontConfig {
        host: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        backend: backend_config,
        payment: PaymentConfig {
            public_key: Some("FLWPUBK_TEST-luxe".to_string()),
            currency: luxe_core::CurrencyCode::USD,
        },
        catalog_refresh: Duration::from_secs(300),
        allowed_origin: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    let state = luxe_storefront::state::AppState::new(config).expect("Failed to build state");
    state.catalog().refresh(state.backend()).await;

    let addr = serve(luxe_storefront::app(state)).await;
    format!("http://{addr}")
}

/// Start the admin service against `backend`, keeping settings at
/// `settings_path`.
pub async fn spawn_admin(backend: &MockBackend, settings_path: &Path) -> String {
    use luxe_admin::config::{AdminConfig, BackendConfig};
    use luxe_admin::services::SettingsStore;

    let mut backend_config = BackendConfig::new(&backend.base_url).expect("Invalid mock URL");
    backend_config.timeout = Duration::from_secs(5);
    let config = AdminConfig {
        host: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        backend: backend_config,
        settings_path: settings_path.to_path_buf(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    let settings = SettingsStore::open(settings_path)
        .await
        .expect("Failed to open settings");
    let state = luxe_admin::state::AppState::new(config, settings).expect("Failed to build state");

    let addr = serve(luxe_admin::app(state)).await;
    format!("http://{addr}")
}

/// HTTP client that keeps session cookies between requests.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
