//! Customer route handlers.

use axum::{Json, Router, extract::State, routing::get};
use luxe_core::Customer;
use tracing::instrument;

use super::or_empty;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new().route("/customers", get(index))
}

/// GET /customers
#[instrument(skip_all)]
async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(or_empty("customers", state.backend().list_customers().await))
}
