//! Agricultural market API module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/market/products | GET | none |
//! | /api/market/cart | GET | session token |
//! | /api/market/cart/items | POST | session token |
//! | /api/market/cart/items/{product_id} | DELETE | session token |
//! | /api/market/checkout | POST | session token |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/market", market_routes())
}

fn market_routes() -> Router<ServerState> {
    Router::new()
        .route("/products", get(handler::list_products))
        .route("/cart", get(handler::cart_view))
        .route("/cart/items", post(handler::add_item))
        .route("/cart/items/{product_id}", delete(handler::remove_item))
        .route("/checkout", post(handler::checkout))
}
