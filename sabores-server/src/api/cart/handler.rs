//! Restaurant cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::cart::{CartLine, CartSummaryEntry};

use crate::api::{with_session, with_session_mut};
use crate::core::ServerState;
use crate::session::SessionToken;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct EditQuantityRequest {
    pub quantity: u32,
}

/// One restaurant's cart with its running total
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

/// Outcome of a remove or quantity edit; `present` is whether the line
/// existed before the operation
#[derive(Debug, Serialize)]
pub struct MutationOutcome {
    pub present: bool,
}

/// GET /api/cart - item counts per restaurant with a non-empty cart
pub async fn summary(
    State(state): State<ServerState>,
    token: SessionToken,
) -> AppResult<Json<AppResponse<Vec<CartSummaryEntry>>>> {
    let entries = with_session(&state, &token, |session| Ok(state.cart.cart_summary(session)))?;
    Ok(ok(entries))
}

/// GET /api/cart/{restaurant_id} - one restaurant's lines and total
pub async fn view(
    State(state): State<ServerState>,
    token: SessionToken,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<AppResponse<CartView>>> {
    let view = with_session(&state, &token, |session| {
        Ok(CartView {
            lines: session
                .carts
                .lines(&restaurant_id)
                .map(|l| l.to_vec())
                .unwrap_or_default(),
            total: state.cart.compute_total(session, &restaurant_id),
        })
    })?;
    Ok(ok(view))
}

/// POST /api/cart/{restaurant_id}/items - add or merge one line
pub async fn add_item(
    State(state): State<ServerState>,
    token: SessionToken,
    Path(restaurant_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<AppResponse<CartView>>> {
    let view = with_session_mut(&state, &token, |session| {
        state
            .cart
            .add_item(session, &restaurant_id, &req.item_id, req.quantity)?;
        Ok(CartView {
            lines: session
                .carts
                .lines(&restaurant_id)
                .map(|l| l.to_vec())
                .unwrap_or_default(),
            total: state.cart.compute_total(session, &restaurant_id),
        })
    })?;
    Ok(ok(view))
}

/// PUT /api/cart/{restaurant_id}/items/{item_id} - overwrite a quantity
///
/// Quantity 0 removes the line.
pub async fn edit_quantity(
    State(state): State<ServerState>,
    token: SessionToken,
    Path((restaurant_id, item_id)): Path<(String, String)>,
    Json(req): Json<EditQuantityRequest>,
) -> AppResult<Json<AppResponse<MutationOutcome>>> {
    let present = with_session_mut(&state, &token, |session| {
        state
            .cart
            .edit_quantity(session, &restaurant_id, &item_id, req.quantity)
            .map_err(Into::into)
    })?;
    Ok(ok(MutationOutcome { present }))
}

/// DELETE /api/cart/{restaurant_id}/items/{item_id}
///
/// Removing an absent line is a no-op, reported through `present`.
pub async fn remove_item(
    State(state): State<ServerState>,
    token: SessionToken,
    Path((restaurant_id, item_id)): Path<(String, String)>,
) -> AppResult<Json<AppResponse<MutationOutcome>>> {
    let present = with_session_mut(&state, &token, |session| {
        state
            .cart
            .remove_item(session, &restaurant_id, &item_id)
            .map_err(Into::into)
    })?;
    Ok(ok(MutationOutcome { present }))
}
