use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{User, UserChanges};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

use super::utils::{json_body, path_id, required};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// With ownership enforcement on, only the token's own user may be changed.
fn ensure_self(state: &AppState, caller: &AuthUser, id: i32) -> Result<(), ApiError> {
    if state.config.security.enforce_ownership && caller.id != id {
        tracing::warn!("User {} attempted to modify user {}", caller.id, id);
        return Err(ApiError::forbidden("You can only modify your own account"));
    }
    Ok(())
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<User> {
    let id = path_id(path)?;

    let user = state
        .users
        .find_user(id)
        .await
        .map_err(|e| ApiError::database(e, "Error retrieving user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user))
}

/// PUT /users/:id - replace username and email
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let id = path_id(path)?;
    let body = json_body(payload)?;
    let changes = UserChanges {
        username: required(body.username, "username")?,
        email: required(body.email, "email")?,
    };
    ensure_self(&state, &caller, id)?;

    let user = state
        .users
        .update_user(id, changes)
        .await
        .map_err(|e| ApiError::database(e, "Error updating user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Message> {
    let id = path_id(path)?;
    ensure_self(&state, &caller, id)?;

    let deleted = state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::database(e, "Error deleting user"))?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!("User {} deleted by {}", id, caller.id);
    Ok(ApiResponse::success(Message { message: "User deleted" }))
}
