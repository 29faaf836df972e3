//! Admin authentication service.
//!
//! A single password, kept in the admin settings, guards the panel. A
//! successful login sets a boolean flag in the session; logging out clears
//! it. There is no lockout and no hashing.

mod error;

pub use error::AuthError;

use secrecy::ExposeSecret;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session_keys;
use crate::services::settings::AdminSettings;

/// Check `password` against the settings and mark the session authenticated.
///
/// # Errors
///
/// Returns [`AuthError::PasswordNotConfigured`] if no password is set and
/// [`AuthError::InvalidPassword`] if it differs. The session is left
/// unauthenticated in both cases.
#[instrument(skip_all)]
pub async fn login(
    session: &Session,
    settings: &AdminSettings,
    password: &str,
) -> Result<(), AuthError> {
    check_password(settings, password)?;

    // Fresh session id on privilege change
    session.cycle_id().await?;
    session.insert(session_keys::AUTHENTICATED, true).await?;
    tracing::info!("Admin logged in");
    Ok(())
}

/// Compare a password with the configured one.
///
/// # Errors
///
/// See [`login`].
pub fn check_password(settings: &AdminSettings, password: &str) -> Result<(), AuthError> {
    if !settings.password_configured() {
        return Err(AuthError::PasswordNotConfigured);
    }
    if settings.admin_password.expose_secret() != password {
        tracing::warn!("Admin login with wrong password");
        return Err(AuthError::InvalidPassword);
    }
    Ok(())
}

/// Clear the session flag.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn logout(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    tracing::info!("Admin logged out");
    Ok(())
}

/// Whether the session has passed the admin gate.
pub async fn is_authenticated(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::AUTHENTICATED)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use crate::services::settings::SettingsUpdate;

    fn settings(password: &str) -> AdminSettings {
        AdminSettings::default().merged(SettingsUpdate {
            admin_password: Some(password.to_string()),
            ..SettingsUpdate::default()
        })
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_unset_password_rejects_everything() {
        let settings = AdminSettings::default();
        assert!(matches!(
            check_password(&settings, ""),
            Err(AuthError::PasswordNotConfigured)
        ));
        assert!(matches!(
            check_password(&settings, "anything"),
            Err(AuthError::PasswordNotConfigured)
        ));
    }

    #[test]
    fn test_password_compare_is_exact() {
        let settings = settings("Secret1");
        assert!(check_password(&settings, "Secret1").is_ok());
        assert!(matches!(
            check_password(&settings, "secret1"),
            Err(AuthError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let session = session();
        let settings = settings("pw");
        assert!(!is_authenticated(&session).await);

        assert!(login(&session, &settings, "wrong").await.is_err());
        assert!(!is_authenticated(&session).await);

        login(&session, &settings, "pw").await.unwrap();
        assert!(is_authenticated(&session).await);

        logout(&session).await.unwrap();
        assert!(!is_authenticated(&session).await);
    }
}
