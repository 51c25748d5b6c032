//! Session token extractor
//!
//! Pulls the opaque session token from the `x-session-token` header so
//! handlers can declare it as a parameter.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::ServerState;
use crate::utils::AppError;

/// Session token header name
pub const SESSION_HEADER: &str = "x-session-token";

/// Opaque session token issued at login or guest entry
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl FromRequestParts<ServerState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|t| !t.is_empty());

        match token {
            Some(t) => Ok(SessionToken(t.to_string())),
            None => Err(AppError::Unauthorized),
        }
    }
}
