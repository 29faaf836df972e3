//! Store backend REST client for administration.
//!
//! # Architecture
//!
//! - Full product list (including inactive), orders and customers
//! - Single-attempt requests with a per-request timeout, no retries
//! - Non-success replies are logged with a truncated body
//!
//! # Example
//!
//! ```rust,ignore
//! use luxe_admin::backend::AdminBackendClient;
//!
//! let client = AdminBackendClient::new(&config.backend)?;
//! let orders = client.list_orders().await?;
//! ```

pub mod types;

use std::sync::Arc;

use luxe_core::{Customer, ListResponse, Order, OrderId, OrderStatus, Product, ProductId};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;
use crate::models::NewProduct;

pub use types::{ImageUpload, UpdateStatusRequest};

/// Errors that can occur when talking to the store backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the store backend's management endpoints.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct AdminBackendClient {
    inner: Arc<AdminBackendClientInner>,
}

struct AdminBackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl AdminBackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            inner: Arc::new(AdminBackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and return the body of a successful reply.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(url));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// Send a request and decode the JSON reply.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, BackendError> {
        let url = self.endpoint(path)?;
        let list: ListResponse<T> = self.send(self.inner.client.get(url)).await?;
        Ok(list.into_vec())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch every product, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply does not decode.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let products: Vec<Product> = self.list("products/admin_list/").await?;
        debug!(count = products.len(), "Fetched admin product list");
        Ok(products)
    }

    /// Create a product from a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError> {
        let url = self.endpoint("products/")?;
        self.send(self.inner.client.post(url).json(product)).await
    }

    /// Create a product with image files as a multipart upload.
    ///
    /// # Errors
    ///
    /// Returns an error if an image part is malformed or the backend rejects
    /// the product.
    #[instrument(skip(self, product, images), fields(name = %product.name, images = images.len()))]
    pub async fn create_product_with_images(
        &self,
        product: &NewProduct,
        images: Vec<ImageUpload>,
    ) -> Result<Product, BackendError> {
        let url = self.endpoint("products/")?;
        let mut form = Form::new()
            .text("name", product.name.clone())
            .text("brand", product.brand.clone())
            .text("category", product.category.clone())
            .text("description", product.description.clone())
            .text("price", product.price.to_string())
            .text("stock_quantity", product.stock_quantity.to_string())
            .text("is_in_stock", product.is_in_stock.to_string())
            .text("is_active", product.is_active.to_string())
            .text("featured", product.featured.to_string())
            .text("sizes", serde_json::to_string(&product.sizes)?)
            .text("colors", serde_json::to_string(&product.colors)?)
            .text("tags", serde_json::to_string(&product.tags)?);
        if let Some(discount) = product.discount_price {
            form = form.text("discount_price", discount.to_string());
        }
        for image in images {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("images", part);
        }

        self.send(self.inner.client.post(url).multipart(form)).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for unknown products.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("products/{id}/"))?;
        self.execute(self.inner.client.delete(url)).await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply does not decode.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        self.list("orders/").await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for unknown orders.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, BackendError> {
        let url = self.endpoint(&format!("orders/{id}/"))?;
        self.send(self.inner.client.get(url)).await
    }

    /// Set an order's status. Transition rules are checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        let url = self.endpoint(&format!("orders/{id}/update_status/"))?;
        self.send(
            self.inner
                .client
                .post(url)
                .json(&UpdateStatusRequest { status }),
        )
        .await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Fetch all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply does not decode.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>, BackendError> {
        self.list("customers/").await
    }
}
