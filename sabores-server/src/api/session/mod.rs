//! Session API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/session/login | POST | none |
//! | /api/session/guest | POST | none |
//! | /api/session/logout | POST | session token |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/session", session_routes())
}

fn session_routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/guest", post(handler::guest))
        .route("/logout", post(handler::logout))
}
