//! Payment API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/payment | POST | session token |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/payment", post(handler::select))
}
