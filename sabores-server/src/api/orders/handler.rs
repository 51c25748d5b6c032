//! Order lookup API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::with_session;
use crate::core::ServerState;
use crate::session::SessionToken;
use crate::storage::CommittedOrder;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/orders/{code} - look up a committed order by public code
///
/// Only the user who placed the order can see it; anyone else gets the
/// same 404 as a nonexistent code.
pub async fn get_by_code(
    State(state): State<ServerState>,
    token: SessionToken,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<CommittedOrder>>> {
    let user_id = with_session(&state, &token, |session| {
        session
            .identity
            .user_id()
            .map(str::to_string)
            .ok_or_else(|| AppError::Forbidden("Guests cannot look up orders".to_string()))
    })?;

    let committed = state
        .store
        .get_order_by_code(&code)
        .map_err(|e| AppError::Storage(e.to_string()))?;

    match committed {
        Some(found) => {
            let owner = match &found {
                CommittedOrder::Restaurant { order, .. } => order.user_id.clone(),
                CommittedOrder::Market { order, .. } => order.user_id.clone(),
            };
            if owner == user_id {
                Ok(ok(found))
            } else {
                Err(AppError::NotFound(format!("order {code}")))
            }
        }
        None => Err(AppError::NotFound(format!("order {code}"))),
    }
}
