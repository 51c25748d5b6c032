//! Order lookup API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders/{code} | GET | session token |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/orders/{code}", get(handler::get_by_code))
}
