//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password gate backed by the settings file
//! - `dashboard` - Dashboard statistics
//! - `settings` - Settings file store with redacted reads

pub mod auth;
pub mod dashboard;
pub mod settings;

pub use auth::AuthError;
pub use dashboard::DashboardStats;
pub use settings::{AdminSettings, SettingsError, SettingsStore, SettingsUpdate, SettingsView};
