//! Session-related types for the admin gate.

/// Session keys for admin state.
pub mod keys {
    /// Key for the flag set by a successful login.
    pub const AUTHENTICATED: &str = "admin_authenticated";
}
