//! Restaurant checkout API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/checkout/{restaurant_id} | POST | session token |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout/{restaurant_id}", post(handler::checkout))
}
