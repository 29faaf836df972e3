//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Carts and filters live
//! only as long as the process; nothing is persisted.

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "luxe_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
///
/// `secure` marks the cookie HTTPS-only.
#[must_use]
pub fn create_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Load a session value, or its default when the session has none yet.
///
/// # Errors
///
/// Returns an error if the store fails or the stored value does not decode.
pub async fn load_or_default<T>(
    session: &Session,
    key: &str,
) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}

/// Store a session value.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the store fails.
pub async fn save<T: Serialize + Sync>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(key, value).await
}
