//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use luxe_core::{OrderStatus, ValidationError};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::services::{AuthError, SettingsError};

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store backend request failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Login rejected.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Settings file could not be read or written.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// A form field failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The order cannot move to the requested status.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Settings(SettingsError::BlankPassword | SettingsError::PasswordRequired) => {
                StatusCode::BAD_REQUEST
            }
            Self::Settings(SettingsError::AlreadyConfigured) => StatusCode::UNAUTHORIZED,
            Self::Settings(_) | Self::Session(_) | Self::Auth(AuthError::Session(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Backend(BackendError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Settings(SettingsError::AlreadyConfigured) => "Admin login required".to_string(),
            Self::Settings(
                err @ (SettingsError::BlankPassword | SettingsError::PasswordRequired),
            ) => err.to_string(),
            Self::Settings(_) | Self::Session(_) | Self::Auth(AuthError::Session(_)) => {
                "Internal server error".to_string()
            }
            Self::Backend(BackendError::NotFound(_)) => "Not found".to_string(),
            Self::Backend(_) => "External service error".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Validation(err) => err.to_string(),
            _ => self.to_string(),
        };

        let body = match &self {
            Self::Validation(err) => json!({ "error": message, "field": err.field() }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("no fields".to_string());
        assert_eq!(err.to_string(), "Bad request: no fields");

        let err = AppError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.to_string(), "Cannot move order from delivered to pending");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::NotFound("x".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Backend(BackendError::RateLimited(2))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidPassword)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordNotConfigured)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Validation(ValidationError::Missing("name"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::InvalidTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Cancelled,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Settings(SettingsError::Io(std::io::Error::other("disk")))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Settings(SettingsError::BlankPassword)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Settings(SettingsError::AlreadyConfigured)),
            StatusCode::UNAUTHORIZED
        );
    }
}
