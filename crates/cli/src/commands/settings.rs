//! Admin settings file commands.
//!
//! # Usage
//!
//! ```bash
//! # Set the admin password before first login
//! luxe-cli settings set --admin-password 'correct horse'
//!
//! # Show the current settings, secrets masked
//! luxe-cli settings show
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_SETTINGS_PATH` - Settings file (default: luxe-admin-settings.json)

use std::path::{Path, PathBuf};

use luxe_admin::config::DEFAULT_SETTINGS_PATH;
use luxe_admin::services::settings::{self, SettingsError, SettingsStore, SettingsUpdate, SettingsView};
use thiserror::Error;

/// Errors from the settings commands.
#[derive(Debug, Error)]
pub enum SettingsCommandError {
    /// The settings file could not be read or written.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// `settings set` was run without any field.
    #[error("Nothing to update; pass at least one field")]
    NothingToUpdate,
}

/// Resolve the settings path: flag, then environment, then default.
#[must_use]
pub fn resolve_path(flag: Option<PathBuf>) -> PathBuf {
    dotenvy::dotenv().ok();

    flag.or_else(|| std::env::var_os("ADMIN_SETTINGS_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
}

/// Read the settings file without changing it.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn show(path: &Path) -> Result<SettingsView, SettingsCommandError> {
    Ok(settings::load_file(path).await?.view())
}

/// Apply a partial update to the settings file.
///
/// # Errors
///
/// Returns [`SettingsCommandError::NothingToUpdate`] for an empty update, or
/// an error if the file cannot be read or written.
pub async fn set(path: &Path, update: SettingsUpdate) -> Result<SettingsView, SettingsCommandError> {
    if update.is_empty() {
        return Err(SettingsCommandError::NothingToUpdate);
    }

    let store = SettingsStore::open(path).await?;
    let view = store.update(update).await?;
    tracing::info!(path = %path.display(), "Settings saved");
    Ok(view)
}
