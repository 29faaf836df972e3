//! Authentication route handlers for admin.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::services::auth;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/status", get(status))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Whether the session is logged in.
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthStatus>> {
    let settings = state.settings().snapshot().await;
    auth::login(&session, &settings, &request.password).await?;
    Ok(Json(AuthStatus {
        authenticated: true,
    }))
}

/// POST /auth/logout
#[instrument(skip_all)]
async fn logout(session: Session) -> Result<Json<AuthStatus>> {
    auth::logout(&session).await?;
    Ok(Json(AuthStatus {
        authenticated: false,
    }))
}

/// GET /auth/status
async fn status(session: Session) -> Json<AuthStatus> {
    Json(AuthStatus {
        authenticated: auth::is_authenticated(&session).await,
    })
}
