//! Restaurant checkout API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::order::{CheckoutRequest, Receipt};

use crate::api::with_session_mut;
use crate::core::ServerState;
use crate::session::SessionToken;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use crate::utils::{AppResponse, AppResult, ok};

/// POST /api/checkout/{restaurant_id} - finalize one restaurant's cart
///
/// On success the receipt is returned and that restaurant's cart is
/// gone from the session; other carts are untouched.
pub async fn checkout(
    State(state): State<ServerState>,
    token: SessionToken,
    Path(restaurant_id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<AppResponse<Receipt>>> {
    validate_optional_text(&req.client_name, "client_name", MAX_NAME_LEN)?;
    validate_optional_text(&req.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let receipt = with_session_mut(&state, &token, |session| {
        state
            .checkout
            .checkout_restaurant(session, &restaurant_id, &req)
            .map_err(Into::into)
    })?;
    Ok(ok(receipt))
}
