//! Restaurant cart API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/cart | GET | session token |
//! | /api/cart/{restaurant_id} | GET | session token |
//! | /api/cart/{restaurant_id}/items | POST | session token |
//! | /api/cart/{restaurant_id}/items/{item_id} | PUT, DELETE | session token |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::summary))
        .route("/{restaurant_id}", get(handler::view))
        .route("/{restaurant_id}/items", post(handler::add_item))
        .route(
            "/{restaurant_id}/items/{item_id}",
            put(handler::edit_quantity).delete(handler::remove_item),
        )
}
