//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur at the admin gate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No admin password has been set yet.
    #[error("admin password not set, configure it first")]
    PasswordNotConfigured,

    /// The submitted password does not match.
    #[error("invalid password")]
    InvalidPassword,

    /// Session store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
