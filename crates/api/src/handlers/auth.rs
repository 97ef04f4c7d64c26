//! Handlers for the `/auth` resource (token issuance).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use orgst_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Email or username, matched case-insensitively.
    pub identifier: String,
    pub password: String,
}

/// Response for `POST /auth/token`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /api/v1/auth/token
///
/// Exchange email-or-username + password for an access token. Failures are
/// deliberately uniform so the endpoint does not leak which part was wrong.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let identifier = input.identifier.trim();

    let user = UserRepo::find_by_identifier(&state.pool, identifier)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::InvalidCredentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::InvalidCredentials);
    }

    let access = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse {
        access,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}
