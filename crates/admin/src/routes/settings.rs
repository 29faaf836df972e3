//! Admin settings routes.
//!
//! Reads never return secrets in full. Writes require a logged-in session,
//! except while no admin password exists yet: that first write is how the
//! password gets set.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::{SettingsUpdate, SettingsView, auth};
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(show).put(update))
}

/// GET /settings
async fn show(_admin: RequireAdmin, State(state): State<AppState>) -> Json<SettingsView> {
    Json(state.settings().view().await)
}

/// PUT /settings
#[instrument(skip_all)]
async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>> {
    if !auth::is_authenticated(&session).await {
        return Ok(Json(state.settings().bootstrap(update).await?));
    }

    if update.is_empty() {
        return Ok(Json(state.settings().view().await));
    }
    Ok(Json(state.settings().update(update).await?))
}
