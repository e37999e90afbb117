//! Handlers for the `/auth` resource (login, verify).

use axum::extract::State;
use axum::Json;
use folio_core::error::CoreError;
use serde::Deserialize;

use crate::auth::jwt::{generate_admin_token, validate_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::response::{ApiResponse, TokenBody, VerifyBody};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Exchange the admin password for an access token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenBody>>> {
    if input.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    let valid = verify_password(&input.password, &state.config.admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::warn!("Admin login failed");
        return Err(AppError::Core(CoreError::Unauthorized("Invalid password".into())));
    }

    let token = generate_admin_token(&state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!("Admin logged in");
    Ok(Json(
        ApiResponse::ok(TokenBody { token }).with_message("Login successful"),
    ))
}

/// POST /api/auth/verify
///
/// Report whether a token is currently valid. Never fails on a bad token.
pub async fn verify(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VerifyRequest>,
) -> Json<ApiResponse<VerifyBody>> {
    let valid = !input.token.is_empty()
        && validate_token(&input.token, &state.config.jwt).is_ok_and(|claims| claims.admin);
    Json(ApiResponse::ok(VerifyBody { valid }))
}
