//! Restaurant directory API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/restaurants | GET | none |
//! | /api/restaurants/{id}/menu | GET | none |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants", get(handler::list))
        .route("/api/restaurants/{id}/menu", get(handler::menu))
}
