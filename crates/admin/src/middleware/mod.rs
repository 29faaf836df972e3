//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//!
//! Route handlers opt into the password gate with [`RequireAdmin`].

pub mod auth;
pub mod session;

pub use auth::{AdminAuthRejection, RequireAdmin};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
