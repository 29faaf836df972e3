//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (only when an allowed origin is configured)
//! 3. `TraceLayer` (request tracing)
//! 4. Session layer (tower-sessions with in-memory store)

pub mod session;

pub use session::{SESSION_COOKIE_NAME, create_session_layer, load_or_default, save};
