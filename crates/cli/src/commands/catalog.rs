//! Catalog inspection commands.
//!
//! Fetches the product list the way the storefront does, including the
//! fallback to the static collection, and applies the same filters.
//!
//! # Usage
//!
//! ```bash
//! luxe-cli catalog list --category shirts --sort price-low
//! ```
//!
//! # Environment Variables
//!
//! - `LUXE_API_BASE_URL` - Store backend; without it only the static
//!   collection is listed

use luxe_core::{FilterError, FilterQuery, Product};
use luxe_storefront::backend::{BackendClient, BackendError};
use luxe_storefront::config::{BackendConfig, ConfigError};
use luxe_storefront::services::catalog::fallback_products;
use luxe_storefront::services::{Catalog, CatalogSource};
use thiserror::Error;

/// Errors from the catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Products after filtering, with where the list came from.
#[derive(Debug)]
pub struct Listing {
    pub source: CatalogSource,
    pub products: Vec<Product>,
}

/// Load the catalog from `api` (or the static collection when `None`) and
/// apply `query`.
///
/// # Errors
///
/// Returns an error if the filter query or the backend URL is invalid. An
/// unreachable backend is not an error; the static collection is used.
pub async fn list(api: Option<String>, query: &FilterQuery) -> Result<Listing, CatalogCommandError> {
    // Validate the filters before any network call
    let filters = query.to_state()?;

    let catalog = Catalog::new();
    match api {
        Some(url) => {
            let client = BackendClient::new(&BackendConfig::new(&url)?)?;
            catalog.refresh(&client).await;
        }
        None => {
            tracing::warn!("No backend URL, listing the static collection");
            catalog.apply(
                catalog.begin_refresh(),
                fallback_products(),
                CatalogSource::Fallback,
            );
        }
    }

    Ok(Listing {
        source: catalog.source(),
        products: filters.derived_list(&catalog.products()),
    })
}

/// One table row for a product.
#[must_use]
pub fn format_row(product: &Product) -> String {
    format!(
        "{:>5}  {:<32}  {:<12}  {:<12}  ${:>9}{}",
        product.id,
        product.name,
        product.brand,
        product.category,
        product.price.round_dp(2),
        if product.in_stock() { "" } else { "  sold out" },
    )
}
