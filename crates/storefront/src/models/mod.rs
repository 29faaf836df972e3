//! Session-held models for the storefront.

pub mod session;

pub use session::{PendingPayment, keys as session_keys};
