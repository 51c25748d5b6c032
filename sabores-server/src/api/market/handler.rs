//! Market API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::cart::MarketCartLine;
use shared::models::Product;
use shared::order::{MarketCheckoutRequest, MarketReceipt};

use crate::api::{with_session, with_session_mut};
use crate::core::ServerState;
use crate::session::SessionToken;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct MarketCartView {
    pub lines: Vec<MarketCartLine>,
    pub total: Decimal,
}

/// GET /api/market/products - catalog of products with stock remaining
///
/// Public; guests browse the market like everyone else.
pub async fn list_products(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let products = state
        .store
        .list_products_in_stock()
        .map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(ok(products))
}

/// GET /api/market/cart - current lines and total
pub async fn cart_view(
    State(state): State<ServerState>,
    token: SessionToken,
) -> AppResult<Json<AppResponse<MarketCartView>>> {
    let view = with_session(&state, &token, |session| {
        let (lines, total) = state.cart.market_cart_view(session);
        Ok(MarketCartView { lines, total })
    })?;
    Ok(ok(view))
}

/// POST /api/market/cart/items - add a product, stock-checked
pub async fn add_item(
    State(state): State<ServerState>,
    token: SessionToken,
    Json(req): Json<AddProductRequest>,
) -> AppResult<Json<AppResponse<MarketCartView>>> {
    let view = with_session_mut(&state, &token, |session| {
        state
            .cart
            .add_market_item(session, &req.product_id, req.quantity)?;
        let (lines, total) = state.cart.market_cart_view(session);
        Ok(MarketCartView { lines, total })
    })?;
    Ok(ok(view))
}

/// DELETE /api/market/cart/items/{product_id}
pub async fn remove_item(
    State(state): State<ServerState>,
    token: SessionToken,
    Path(product_id): Path<String>,
) -> AppResult<Json<AppResponse<MarketCartView>>> {
    let view = with_session_mut(&state, &token, |session| {
        state.cart.remove_market_item(session, &product_id)?;
        let (lines, total) = state.cart.market_cart_view(session);
        Ok(MarketCartView { lines, total })
    })?;
    Ok(ok(view))
}

/// POST /api/market/checkout - finalize the market cart
///
/// Decrements stock atomically; a concurrent checkout racing over the
/// last units gets a 409.
pub async fn checkout(
    State(state): State<ServerState>,
    token: SessionToken,
    Json(req): Json<MarketCheckoutRequest>,
) -> AppResult<Json<AppResponse<MarketReceipt>>> {
    validate_optional_text(&req.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let receipt = with_session_mut(&state, &token, |session| {
        state.checkout.checkout_market(session, &req).map_err(Into::into)
    })?;
    Ok(ok(receipt))
}
