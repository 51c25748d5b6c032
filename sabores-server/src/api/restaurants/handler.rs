//! Restaurant directory API Handlers
//!
//! Public browse endpoints; guests see the same catalog as signed-in
//! users.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{MenuItem, Restaurant};

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/restaurants - the whole directory
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Restaurant>>>> {
    let restaurants = state
        .store
        .list_restaurants()
        .map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(ok(restaurants))
}

/// GET /api/restaurants/{id}/menu - one restaurant's menu
pub async fn menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    if state
        .store
        .get_restaurant(&id)
        .map_err(|e| AppError::Storage(e.to_string()))?
        .is_none()
    {
        return Err(AppError::NotFound(format!("restaurant {id}")));
    }

    let items = state
        .store
        .list_menu_items(&id)
        .map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(ok(items))
}
