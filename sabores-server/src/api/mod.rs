//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`session`] - login, guest entry, logout
//! - [`restaurants`] - restaurant directory and menus
//! - [`payment`] - payment method selection
//! - [`cart`] - per-restaurant cart operations
//! - [`market`] - market catalog, cart and checkout
//! - [`checkout`] - restaurant checkout
//! - [`orders`] - order lookup by public code
//!
//! Each submodule exposes `router()`; [`create_router`] merges them and
//! attaches the shared middleware stack.

pub mod cart;
pub mod checkout;
pub mod health;
pub mod market;
pub mod orders;
pub mod payment;
pub mod restaurants;
pub mod session;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;
use crate::session::{SessionData, SessionToken};
use crate::utils::{AppError, AppResult};

/// Build the full application router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(session::router())
        .merge(restaurants::router())
        .merge(payment::router())
        .merge(cart::router())
        .merge(market::router())
        .merge(checkout::router())
        .merge(orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run a closure against the token's session, mapping an unknown token
/// to [`AppError::SessionNotFound`]
pub(crate) fn with_session<R>(
    state: &ServerState,
    token: &SessionToken,
    f: impl FnOnce(&SessionData) -> AppResult<R>,
) -> AppResult<R> {
    match state.sessions.with_session(&token.0, f) {
        Some(result) => result,
        None => Err(AppError::SessionNotFound),
    }
}

/// Mutable variant of [`with_session`]; the closure runs under the
/// session's entry lock
pub(crate) fn with_session_mut<R>(
    state: &ServerState,
    token: &SessionToken,
    f: impl FnOnce(&mut SessionData) -> AppResult<R>,
) -> AppResult<R> {
    match state.sessions.with_session_mut(&token.0, f) {
        Some(result) => result,
        None => Err(AppError::SessionNotFound),
    }
}
