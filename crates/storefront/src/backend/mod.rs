//! Store backend REST client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, orders and payments
//! - Single-attempt requests with a per-request timeout, no retries
//! - Checkout settings are cached in memory via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use luxe_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?;
//! let products = client.list_products().await?;
//! ```

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use luxe_core::{
    CheckoutSettings, CheckoutSettingsPayload, ListResponse, NewOrder, OrderAck, Product,
    ValidationError,
};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;

pub use types::{PaymentVerification, VerifyPaymentRequest};

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

    /// Backend sent values that fail validation.
    #[error("Invalid backend data: {0}")]
    Invalid(#[from] ValidationError),

    /// A path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

const SETTINGS_CACHE_KEY: &str = "checkout-settings";

/// Client for the store backend.
///
/// Cheap to clone; clones share the connection pool and settings cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    settings: Cache<&'static str, CheckoutSettings>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let settings = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                settings,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Resolve a media path (`/media/x.jpg`) against the backend origin.
    /// Absolute URLs are returned unchanged.
    #[must_use]
    pub fn media_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        self.inner
            .base_url
            .join(path)
            .map_or_else(|_| path.to_string(), String::from)
    }

    /// Send a request and decode the JSON reply.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
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

        // Read the body as text first for better error diagnostics
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

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Fetch the public product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply does not decode.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let url = self.endpoint("products/")?;
        let products: ListResponse<Product> = self.send(self.inner.client.get(url)).await?;
        let mut products = products.into_vec();
        for image in products.iter_mut().flat_map(|p| p.images.iter_mut()) {
            image.image = self.media_url(&image.image);
        }
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch and normalize the checkout settings, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the values are invalid.
    #[instrument(skip(self))]
    pub async fn fetch_checkout_settings(&self) -> Result<CheckoutSettings, BackendError> {
        let url = self.endpoint("checkout-settings/")?;
        let payload: CheckoutSettingsPayload = self.send(self.inner.client.get(url)).await?;
        Ok(CheckoutSettings::try_from(payload)?)
    }

    /// Checkout settings, cached for five minutes.
    ///
    /// Falls back to the defaults (no surcharge, no tax, 3700 UGX/USD) when
    /// the backend cannot provide them. Fallback values are not cached.
    pub async fn checkout_settings(&self) -> CheckoutSettings {
        if let Some(settings) = self.inner.settings.get(SETTINGS_CACHE_KEY).await {
            debug!("Cache hit for checkout settings");
            return settings;
        }

        match self.fetch_checkout_settings().await {
            Ok(settings) => {
                self.inner
                    .settings
                    .insert(SETTINGS_CACHE_KEY, settings)
                    .await;
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load checkout settings, using defaults");
                CheckoutSettings::default()
            }
        }
    }

    /// Ask the backend to verify a transaction with the payment gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply does not decode.
    #[instrument(skip(self))]
    pub async fn verify_payment(
        &self,
        transaction_id: &str,
        tx_ref: &str,
    ) -> Result<PaymentVerification, BackendError> {
        let url = self.endpoint("payments/verify/")?;
        let body = VerifyPaymentRequest {
            transaction_id,
            tx_ref,
        };
        self.send(self.inner.client.post(url).json(&body)).await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend does not acknowledge the order.
    #[instrument(skip(self, order), fields(reference = %order.payment_reference))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderAck, BackendError> {
        let url = self.endpoint("orders/")?;
        self.send(self.inner.client.post(url).json(order)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        BackendClient::new(&BackendConfig::new("http://127.0.0.1:8080/api").unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        assert_eq!(
            client().endpoint("orders/").unwrap().as_str(),
            "http://127.0.0.1:8080/api/orders/"
        );
    }

    #[test]
    fn test_media_url() {
        let client = client();
        assert_eq!(
            client.media_url("/media/products/tee.jpg"),
            "http://127.0.0.1:8080/media/products/tee.jpg"
        );
        assert_eq!(
            client.media_url("https://cdn.example.com/tee.jpg"),
            "https://cdn.example.com/tee.jpg"
        );
    }
}
