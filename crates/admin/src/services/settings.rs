//! Admin settings persisted as a JSON file.
//!
//! Holds the admin password and the payment gateway keys. The file is plain
//! JSON on local disk (not encrypted). In memory the secrets are wrapped in
//! [`SecretString`] so they never reach logs; reads for display go through
//! [`SettingsView`], which masks them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

/// Errors from reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the admin password cannot be blank")]
    BlankPassword,
    #[error("set an admin password first")]
    PasswordRequired,
    #[error("an admin password is already set")]
    AlreadyConfigured,
}

/// Admin settings.
///
/// Implements `Debug` manually to redact the secrets.
#[derive(Clone)]
pub struct AdminSettings {
    /// Password for the admin gate. Empty means not configured.
    pub admin_password: SecretString,
    /// Public key for the hosted payment widget (not secret).
    pub payment_public_key: String,
    pub payment_secret_key: SecretString,
    pub payment_encryption_key: SecretString,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            admin_password: SecretString::from(String::new()),
            payment_public_key: String::new(),
            payment_secret_key: SecretString::from(String::new()),
            payment_encryption_key: SecretString::from(String::new()),
        }
    }
}

impl std::fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSettings")
            .field("admin_password", &"[REDACTED]")
            .field("payment_public_key", &self.payment_public_key)
            .field("payment_secret_key", &"[REDACTED]")
            .field("payment_encryption_key", &"[REDACTED]")
            .finish()
    }
}

impl AdminSettings {
    /// Whether an admin password has been set.
    #[must_use]
    pub fn password_configured(&self) -> bool {
        !self.admin_password.expose_secret().is_empty()
    }

    /// A copy with `update` applied; fields absent from `update` are kept.
    #[must_use]
    pub fn merged(&self, update: SettingsUpdate) -> Self {
        Self {
            admin_password: update
                .admin_password
                .map_or_else(|| self.admin_password.clone(), SecretString::from),
            payment_public_key: update
                .payment_public_key
                .unwrap_or_else(|| self.payment_public_key.clone()),
            payment_secret_key: update
                .payment_secret_key
                .map_or_else(|| self.payment_secret_key.clone(), SecretString::from),
            payment_encryption_key: update
                .payment_encryption_key
                .map_or_else(|| self.payment_encryption_key.clone(), SecretString::from),
        }
    }

    /// The redacted form safe to show or log.
    #[must_use]
    pub fn view(&self) -> SettingsView {
        SettingsView {
            admin_password_configured: self.password_configured(),
            payment_public_key: self.payment_public_key.clone(),
            payment_secret_key: mask(self.payment_secret_key.expose_secret()),
            payment_encryption_key: mask(self.payment_encryption_key.expose_secret()),
        }
    }
}

/// On-disk representation. Accepts the camelCase keys older files used.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default, alias = "adminPassword")]
    admin_password: String,
    #[serde(default, alias = "flutterwavePublicKey")]
    payment_public_key: String,
    #[serde(default, alias = "flutterwaveSecretKey")]
    payment_secret_key: String,
    #[serde(default, alias = "flutterwaveEncryptionKey")]
    payment_encryption_key: String,
}

impl From<SettingsFile> for AdminSettings {
    fn from(file: SettingsFile) -> Self {
        Self {
            admin_password: SecretString::from(file.admin_password),
            payment_public_key: file.payment_public_key,
            payment_secret_key: SecretString::from(file.payment_secret_key),
            payment_encryption_key: SecretString::from(file.payment_encryption_key),
        }
    }
}

impl From<&AdminSettings> for SettingsFile {
    fn from(settings: &AdminSettings) -> Self {
        Self {
            admin_password: settings.admin_password.expose_secret().to_string(),
            payment_public_key: settings.payment_public_key.clone(),
            payment_secret_key: settings.payment_secret_key.expose_secret().to_string(),
            payment_encryption_key: settings.payment_encryption_key.expose_secret().to_string(),
        }
    }
}

/// Settings as returned to the admin UI and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub admin_password_configured: bool,
    pub payment_public_key: String,
    /// Masked; `None` when unset.
    pub payment_secret_key: Option<String>,
    /// Masked; `None` when unset.
    pub payment_encryption_key: Option<String>,
}

/// A partial update. Absent fields are left unchanged; an empty string
/// clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub payment_public_key: Option<String>,
    #[serde(default)]
    pub payment_secret_key: Option<String>,
    #[serde(default)]
    pub payment_encryption_key: Option<String>,
}

impl SettingsUpdate {
    /// Whether the update sets a non-blank admin password.
    #[must_use]
    pub fn sets_password(&self) -> bool {
        self.admin_password
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.admin_password.is_none()
            && self.payment_public_key.is_none()
            && self.payment_secret_key.is_none()
            && self.payment_encryption_key.is_none()
    }
}

/// Show only the last four characters of secrets longer than eight.
fn mask(secret: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return Some("****".to_string());
    }
    let tail: String = chars.iter().skip(chars.len() - 4).collect();
    Some(format!("****{tail}"))
}

/// Read settings from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn load_file(path: &Path) -> Result<AdminSettings, SettingsError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            let file: SettingsFile = serde_json::from_str(&contents)?;
            Ok(file.into())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No settings file, using defaults");
            Ok(AdminSettings::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Write settings to `path`, replacing the file atomically.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn save_file(path: &Path, settings: &AdminSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(&SettingsFile::from(settings))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Settings shared by the admin handlers, backed by the settings file.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsStoreInner>,
}

struct SettingsStoreInner {
    path: PathBuf,
    current: RwLock<AdminSettings>,
}

impl SettingsStore {
    /// Load the store from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let current = load_file(&path).await?;
        Ok(Self {
            inner: Arc::new(SettingsStoreInner {
                path,
                current: RwLock::new(current),
            }),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// A copy of the current settings.
    pub async fn snapshot(&self) -> AdminSettings {
        self.inner.current.read().await.clone()
    }

    /// The current settings with secrets masked.
    pub async fn view(&self) -> SettingsView {
        self.inner.current.read().await.view()
    }

    /// Apply a partial update and persist it.
    ///
    /// The in-memory settings change only after the file is written.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BlankPassword`] if the update would clear the
    /// admin password, or an error if the file cannot be written.
    #[instrument(skip_all, fields(path = %self.inner.path.display()))]
    pub async fn update(&self, update: SettingsUpdate) -> Result<SettingsView, SettingsError> {
        if update.admin_password.is_some() && !update.sets_password() {
            return Err(SettingsError::BlankPassword);
        }
        let mut current = self.inner.current.write().await;
        self.write(&mut current, update).await
    }

    /// First write on a fresh install, made before anyone can log in.
    ///
    /// Succeeds only while no admin password exists, and only if the update
    /// sets one. The check and the write happen under one lock, so of two
    /// racing first writes exactly one wins.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::AlreadyConfigured`] once a password exists,
    /// [`SettingsError::PasswordRequired`] if the update sets none, or an
    /// error if the file cannot be written.
    #[instrument(skip_all, fields(path = %self.inner.path.display()))]
    pub async fn bootstrap(&self, update: SettingsUpdate) -> Result<SettingsView, SettingsError> {
        let mut current = self.inner.current.write().await;
        if current.password_configured() {
            return Err(SettingsError::AlreadyConfigured);
        }
        if !update.sets_password() {
            return Err(SettingsError::PasswordRequired);
        }
        self.write(&mut current, update).await
    }

    async fn write(
        &self,
        current: &mut AdminSettings,
        update: SettingsUpdate,
    ) -> Result<SettingsView, SettingsError> {
        let next = current.merged(update);
        save_file(&self.inner.path, &next).await?;
        *current = next;
        tracing::info!("Admin settings updated");
        Ok(current.view())
    }
}
