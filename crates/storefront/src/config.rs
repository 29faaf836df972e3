//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUXE_API_BASE_URL` - Base URL of the store REST backend (e.g. `http://127.0.0.1:8080/api/`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `LUXE_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `CATALOG_REFRESH_SECS` - Catalog refetch interval (default: 300)
//! - `STOREFRONT_ALLOWED_ORIGIN` - Browser origin allowed to call the API with cookies
//! - `PAYMENT_PUBLIC_KEY` - Public key handed to the hosted payment widget
//! - `PAYMENT_CURRENCY` - Currency charged by the widget (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use luxe_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Store backend connection settings
    pub backend: BackendConfig,
    /// Hosted payment widget settings
    pub payment: PaymentConfig,
    /// How often the shared catalog is refetched
    pub catalog_refresh: Duration,
    /// Origin of the browser frontend, if it is served from another host
    pub allowed_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Store backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, always ending in `/` so relative paths join beneath it.
    pub base_url: Url,
    pub timeout: Duration,
}

/// Hosted payment widget settings.
#[derive(Debug, Clone, Default)]
pub struct PaymentConfig {
    /// Public key sent to the browser; absent in development.
    pub public_key: Option<String>,
    pub currency: CurrencyCode,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let backend = BackendConfig::from_env()?;
        let payment = PaymentConfig::from_env()?;
        let catalog_refresh = Duration::from_secs(parse_env("CATALOG_REFRESH_SECS", "300")?);
        let allowed_origin = get_optional_env("STOREFRONT_ALLOWED_ORIGIN");

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            backend,
            payment,
            catalog_refresh,
            allowed_origin,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should be HTTPS-only.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.allowed_origin
            .as_deref()
            .is_some_and(|origin| origin.starts_with("https://"))
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url("LUXE_API_BASE_URL", &get_required_env("LUXE_API_BASE_URL")?)?;
        let timeout = Duration::from_secs(parse_env("LUXE_API_TIMEOUT_SECS", "10")?);
        Ok(Self { base_url, timeout })
    }

    /// Settings for a backend at `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            timeout: Duration::from_secs(10),
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let currency = get_env_or_default("PAYMENT_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("PAYMENT_CURRENCY".to_string(), e))?;
        Ok(Self {
            public_key: get_optional_env("PAYMENT_PUBLIC_KEY"),
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a backend base URL, appending the trailing slash `Url::join` needs.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("TEST", "http://127.0.0.1:8080/api").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/");
        assert_eq!(
            url.join("products/").unwrap().as_str(),
            "http://127.0.0.1:8080/api/products/"
        );
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("TEST", "ftp://example.com/"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_base_url("TEST", "not a url").is_err());
    }

    #[test]
    fn test_backend_config_new() {
        let config = BackendConfig::new("https://api.luxe.store").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.luxe.store/");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            backend: BackendConfig::new("http://localhost:8080/api/").unwrap(),
            payment: PaymentConfig::default(),
            catalog_refresh: Duration::from_secs(300),
            allowed_origin: Some("https://luxe.store".to_string()),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.secure_cookies());
    }
}
