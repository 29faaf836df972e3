//! LUXE Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate holds the privileged side of the store:
//! - Backend management endpoints (products, orders, customers)
//! - The admin password and payment gateway secrets (settings file)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Build the admin router with its full middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes::routes()
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::config::{AdminConfig, BackendConfig};
    use crate::services::SettingsStore;

    async fn state(dir: &tempfile::TempDir) -> AppState {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            backend: BackendConfig::new("http://127.0.0.1:9/api/").unwrap(),
            settings_path: dir.path().join("settings.json"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };
        let settings = SettingsStore::open(&config.settings_path).await.unwrap();
        AppState::new(config, settings).unwrap()
    }

    #[tokio::test]
    async fn test_protected_routes_require_login() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(state(&dir).await);

        for uri in ["/dashboard", "/products", "/orders", "/customers", "/settings"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_without_password_configured() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(state(&dir).await)
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"password":"anything"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_first_settings_write_must_set_password() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(state(&dir).await);

        let put = |body: &'static str| {
            Request::put("/settings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap()
        };

        let response = app
            .clone()
            .oneshot(put(r#"{"payment_public_key":"FLWPUBK-1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(put(r#"{"admin_password":"letmein"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Password now set, so anonymous writes are refused
        let response = app
            .oneshot(put(r#"{"payment_public_key":"FLWPUBK-2"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
