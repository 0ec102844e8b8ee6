// handlers/auth.rs - token acquisition for the user service

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{json_body, required};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /auth/register - Create a user account
///
/// Expected Input:
/// ```json
/// { "username": "ada", "email": "ada@example.com", "password": "..." }
/// ```
///
/// Responds 201 with the stored user (never the password hash), or 409
/// when the username or email is taken.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let body = json_body(payload)?;
    let username = required(body.username, "username")?;
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;

    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("Failed to register user")
        })?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal_server_error("Failed to register user")
        })?;

    let user = state
        .users
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| ApiError::database(e, "Failed to register user"))?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(ApiResponse::created(user))
}

/// POST /auth/login - Exchange username and password for a bearer token
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "user": { "id": 1, "username": "ada", ... } }
/// ```
///
/// Unknown usernames and wrong passwords both answer 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let body = json_body(payload)?;
    let username = required(body.username, "username")?;
    let password = required(body.password, "password")?;

    let found = state
        .users
        .find_credentials(&username)
        .await
        .map_err(|e| ApiError::database(e, "Failed to log in"))?;

    let Some(creds) = found else {
        // Same Argon2 cost as a wrong password
        let dummy = tokio::task::spawn_blocking(move || password::verify_dummy(&password));
        if let Err(e) = dummy.await {
            tracing::error!("Password verification task failed: {}", e);
        }
        tracing::warn!("Failed login for unknown user {}", username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let stored_hash = creds.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || {
        password::verify_password(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Password verification task failed: {}", e);
        ApiError::internal_server_error("Failed to log in")
    })?
    .map_err(|e| {
        tracing::error!("Stored password hash for user {} is unreadable: {}", creds.id, e);
        ApiError::internal_server_error("Failed to log in")
    })?;

    if !valid {
        tracing::warn!("Failed login for {}", creds.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.tokens.issue(creds.id, &creds.username)?;

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: creds.into(),
    }))
}
