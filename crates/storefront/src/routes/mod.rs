//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Health check
//!
//! # Products
//! GET    /products              - Filtered product listing
//! GET    /products/{id}         - Product detail
//!
//! # Filters (session)
//! GET    /filters               - Current facets
//! POST   /filters               - Apply one facet change
//! DELETE /filters               - Reset facets
//!
//! # Cart (session)
//! GET    /cart                  - Cart contents and totals
//! POST   /cart/add              - Add a variant
//! POST   /cart/update           - Set a line's quantity
//! POST   /cart/remove           - Remove a variant or a whole product
//! DELETE /cart                  - Empty the cart
//!
//! # Checkout
//! GET    /checkout/summary      - Price quote (`?shipping=standard|express`)
//! POST   /checkout              - Start a payment
//! POST   /checkout/confirm      - Verify payment and place the order
//! ```

pub mod cart;
pub mod checkout;
pub mod filters;
pub mod products;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;

use crate::services::CatalogSource;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the filter routes router.
pub fn filter_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(filters::show).post(filters::update).delete(filters::clear),
    )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::begin))
        .route("/summary", get(checkout::summary))
        .route("/confirm", post(checkout::confirm))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/filters", filter_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

/// Health check reply.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub catalog: CatalogSource,
    pub products: usize,
}

/// Liveness health check.
///
/// Always succeeds while the server runs; reports where the catalog came from.
async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        catalog: state.catalog().source(),
        products: state.catalog().products().len(),
    })
}
