//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Health check
//!
//! # Auth (single password from the settings file)
//! POST   /auth/login            - Log in
//! POST   /auth/logout           - Log out
//! GET    /auth/status           - Whether this session is logged in
//!
//! # Dashboard
//! GET    /dashboard             - Headline statistics
//!
//! # Products
//! GET    /products              - All products, active or not
//! POST   /products              - Create from a JSON form
//! POST   /products/upload       - Create from a multipart form with images
//! DELETE /products/{id}         - Delete
//!
//! # Orders
//! GET    /orders                - Order listing
//! GET    /orders/{id}           - Order detail
//! POST   /orders/{id}/status    - Move to another status
//!
//! # Customers
//! GET    /customers             - Customer listing
//!
//! # Settings
//! GET    /settings              - Current settings, secrets masked
//! PUT    /settings              - Partial update
//! ```
//!
//! Everything except `/health`, `/auth/*` and the first-run settings write
//! requires a logged-in session.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::backend::BackendError;
use crate::state::AppState;

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(customers::router())
        .merge(settings::router())
}

/// Liveness health check.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Unwrap a backend list read, degrading to an empty list.
///
/// Admin tables stay usable while the backend is down; the failure is
/// logged instead of surfaced.
pub(crate) fn or_empty<T>(what: &'static str, result: Result<Vec<T>, BackendError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, list = what, "Backend list failed, showing empty list");
        Vec::new()
    })
}
