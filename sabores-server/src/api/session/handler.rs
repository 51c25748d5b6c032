//! Session API Handlers
//!
//! Identity verification happens upstream; `login` records an
//! already-authenticated user on a fresh session and hands back the
//! opaque token the client sends on every later request.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::session::SessionToken;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
}

/// POST /api/session/login - start a signed-in session
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<SessionResponse>>> {
    validate_required_text(&req.user_id, "user_id", MAX_NAME_LEN)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;

    let token = state.sessions.login(req.user_id, req.name);
    tracing::info!("user session started");
    Ok(ok(SessionResponse { token }))
}

/// POST /api/session/guest - start a browse-only session
pub async fn guest(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<SessionResponse>>> {
    let token = state.sessions.guest();
    Ok(ok(SessionResponse { token }))
}

/// POST /api/session/logout - drop the session and everything in it
pub async fn logout(
    State(state): State<ServerState>,
    token: SessionToken,
) -> AppResult<Json<AppResponse<()>>> {
    // Unknown tokens are fine; logout is idempotent
    state.sessions.logout(&token.0);
    Ok(ok_with_message((), "Session closed"))
}
