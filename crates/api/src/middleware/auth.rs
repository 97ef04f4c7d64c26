//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use orgst_core::access::Principal;
use orgst_core::error::CoreError;
use orgst_core::roles::INVITER_ROLE_KEYS;
use orgst_db::repositories::{RoleRepo, UserRepo};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Resolves the token subject against the database and loads the user's
/// role keys, so handlers receive a ready-to-evaluate [`Principal`].
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.principal.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub principal: Principal,
}

impl AuthUser {
    pub fn user_id(&self) -> orgst_core::types::DbId {
        self.principal.user_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Unknown or inactive user".into()))
            })?;

        let roles = RoleRepo::keys_for_user(&state.pool, user.id).await?;

        Ok(AuthUser {
            principal: Principal {
                user_id: user.id,
                is_staff: user.is_staff,
                roles,
            },
        })
    }
}

/// Requires a principal allowed to create invitations: staff, or a holder
/// of an admin/cofounder role. Rejects with 403 Forbidden otherwise.
pub struct RequireInviter(pub AuthUser);

impl FromRequestParts<AppState> for RequireInviter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.principal.is_staff && !user.principal.has_any_role(INVITER_ROLE_KEYS) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or cofounder role required".into(),
            )));
        }
        Ok(RequireInviter(user))
    }
}
