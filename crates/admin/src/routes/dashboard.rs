//! Dashboard route handler.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use super::or_empty;
use crate::middleware::RequireAdmin;
use crate::services::DashboardStats;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// GET /dashboard
///
/// The three backend lists are fetched concurrently; any that fails counts
/// as empty.
#[instrument(skip_all)]
async fn dashboard(_admin: RequireAdmin, State(state): State<AppState>) -> Json<DashboardStats> {
    let backend = state.backend();
    let (products, orders, customers) = tokio::join!(
        backend.list_products(),
        backend.list_orders(),
        backend.list_customers(),
    );

    Json(DashboardStats::compute(
        &or_empty("products", products),
        &or_empty("orders", orders),
        &or_empty("customers", customers),
    ))
}
