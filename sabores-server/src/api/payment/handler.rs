//! Payment API Handlers

use axum::{Json, extract::State};
use shared::order::{PaymentRequest, PaymentSelection};

use crate::api::with_session_mut;
use crate::checkout;
use crate::core::ServerState;
use crate::session::SessionToken;
use crate::utils::{AppResponse, AppResult, ok};

/// POST /api/payment - validate and record the payment selection
///
/// The stored selection carries only the masked detail string; raw
/// card and account numbers never leave this request.
pub async fn select(
    State(state): State<ServerState>,
    token: SessionToken,
    Json(req): Json<PaymentRequest>,
) -> AppResult<Json<AppResponse<PaymentSelection>>> {
    let selection = with_session_mut(&state, &token, |session| {
        checkout::select_payment(session, &req).map_err(Into::into)
    })?;
    Ok(ok(selection))
}
