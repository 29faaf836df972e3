//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use luxe_core::{FilterQuery, FilterState, Product, ProductId};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::load_or_default;
use crate::models::session_keys;
use crate::services::CatalogSource;
use crate::state::AppState;

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
    pub source: CatalogSource,
    pub filters: FilterState,
}

/// List products through the shopper's filters.
///
/// Query parameters, when given, replace the session's filter state for
/// this request only.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ProductList>> {
    let filters = if query.is_empty() {
        load_or_default::<FilterState>(&session, session_keys::FILTERS).await?
    } else {
        query.to_state()?
    };

    let catalog = state.catalog().products();
    let products = filters.derived_list(&catalog);

    Ok(Json(ProductList {
        total: products.len(),
        products,
        source: state.catalog().source(),
        filters,
    }))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
