//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUXE_API_BASE_URL` - Base URL of the store REST backend
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: <http://localhost:3001>)
//! - `ADMIN_SETTINGS_PATH` - Settings file (default: luxe-admin-settings.json)
//! - `LUXE_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default location of the settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "luxe-admin-settings.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Store backend connection settings
    pub backend: BackendConfig,
    /// Where admin settings are persisted
    pub settings_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Store backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, always ending in `/`.
    pub base_url: Url,
    pub timeout: Duration,
}

impl AdminConfig {
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

        let host = parse_env("ADMIN_HOST", "127.0.0.1")?;
        let port = parse_env("ADMIN_PORT", "3001")?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");
        let backend = BackendConfig::from_env()?;
        let settings_path =
            PathBuf::from(get_env_or_default("ADMIN_SETTINGS_PATH", DEFAULT_SETTINGS_PATH));

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
            base_url,
            backend,
            settings_path,
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

    /// Whether the admin panel is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("LUXE_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("LUXE_API_BASE_URL".to_string()))?;
        let mut config = Self::new(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("LUXE_API_BASE_URL".to_string(), e.to_string()))?;
        config.timeout = Duration::from_secs(parse_env("LUXE_API_TIMEOUT_SECS", "10")?);
        Ok(config)
    }

    /// Settings for a backend at `base_url` with a 10 second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(base_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(url::ParseError::RelativeUrlWithoutBase);
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            timeout: Duration::from_secs(10),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

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
    fn test_backend_config_adds_trailing_slash() {
        let config = BackendConfig::new("http://127.0.0.1:8000/api").unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8000/api/");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_backend_config_rejects_non_http() {
        assert!(BackendConfig::new("file:///etc/passwd").is_err());
        assert!(BackendConfig::new("nope").is_err());
    }

    #[test]
    fn test_socket_addr_and_security() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "https://admin.luxe.store".to_string(),
            backend: BackendConfig::new("http://localhost:8000/api/").unwrap(),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert!(config.is_secure());
    }
}
