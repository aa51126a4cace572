use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::session::{bearer_token, CurrentSession};
use crate::errors::AppError;
use crate::models::user::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: CurrentUser,
}

/// POST /api/v1/auth/login
///
/// A token presented alongside the login is discarded, so re-logging in never
/// inherits the previous visit's state.
pub async fn handle_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let role = state
        .credentials
        .authenticate(&req.identity, &req.secret)
        .await
        .map_err(|e| {
            warn!(identity = %req.identity, "Login rejected");
            AppError::from(e)
        })?;

    let user = CurrentUser {
        identity: req.identity,
        role,
    };
    let token = state
        .sessions
        .open(user.clone(), bearer_token(&headers))
        .await;
    info!(identity = %user.identity, role = ?user.role, "Session opened");

    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> StatusCode {
    state.sessions.close(session.token).await;
    info!(identity = %session.context.user.identity, "Session closed");
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
pub async fn handle_me(session: CurrentSession) -> Json<CurrentUser> {
    Json(session.context.user)
}
