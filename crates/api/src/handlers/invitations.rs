//! Handlers for the `/invitations` resource.
//!
//! Creation requires staff or an admin/cofounder role; validation and
//! acceptance are public (the invitee has no account yet).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use orgst_core::error::CoreError;
use orgst_core::types::{DbId, Timestamp};
use orgst_db::models::invitation::CreateInvitation;
use orgst_db::models::user::CreateUser;
use orgst_db::repositories::{InvitationRepo, RoleRepo};

use crate::auth::jwt::{generate_invitation_token, hash_invitation_token};
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireInviter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default invitation lifetime in days.
const DEFAULT_EXPIRES_IN_DAYS: i64 = 7;

/* --------------------------------------------------------------------------
Request / response types
-------------------------------------------------------------------------- */

/// Response for invitation creation. `invite_token` is the plaintext token,
/// returned only here.
#[derive(Debug, Serialize)]
pub struct InvitationCreated {
    pub id: uuid::Uuid,
    pub email: String,
    pub status: String,
    pub expires_at: Timestamp,
    pub invite_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub token: String,
}

/// Response for `GET /invitations/validate`. An unknown or expired token is
/// `valid: false`, not an error.
#[derive(Debug, Serialize)]
pub struct InvitationValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

/// Request body for `POST /invitations/accept`.
#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    pub token: String,
    pub password: String,
    pub display_name: String,
}

/// Response for invitation acceptance.
#[derive(Debug, Serialize)]
pub struct InvitationAccepted {
    pub user_id: DbId,
    pub email: String,
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// POST /invitations
///
/// Create an invitation carrying a set of role keys. Only the SHA-256 hash
/// of the token is stored.
pub async fn create_invitation(
    RequireInviter(user): RequireInviter,
    State(state): State<AppState>,
    Json(input): Json<CreateInvitation>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email is required".into(),
        )));
    }

    let roles = RoleRepo::find_by_keys(&state.pool, &input.role_keys).await?;
    if roles.len() != input.role_keys.len() {
        return Err(AppError::Core(CoreError::Validation(
            "Unknown role key in role_keys".into(),
        )));
    }
    let role_ids: Vec<DbId> = roles.iter().map(|r| r.id).collect();

    let expires_in_days = input.expires_in_days.unwrap_or(DEFAULT_EXPIRES_IN_DAYS);
    if expires_in_days <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "expires_in_days must be positive".into(),
        )));
    }

    let (plaintext, token_hash) = generate_invitation_token();
    let invitation = InvitationRepo::create(
        &state.pool,
        &email,
        &token_hash,
        user.user_id(),
        &role_ids,
        expires_in_days,
    )
    .await?;

    tracing::info!(
        user_id = user.user_id(),
        invitation_id = %invitation.id,
        email = %invitation.email,
        "Invitation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InvitationCreated {
                id: invitation.id,
                email: invitation.email,
                status: invitation.status,
                expires_at: invitation.expires_at,
                invite_token: plaintext,
            },
        }),
    ))
}

/// GET /invitations/validate?token=...
///
/// Public probe used by the signup page.
pub async fn validate_invitation(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_invitation_token(&params.token);
    let Some(invitation) =
        InvitationRepo::find_pending_by_token_hash(&state.pool, &token_hash).await?
    else {
        return Ok(Json(DataResponse {
            data: InvitationValidation {
                valid: false,
                email: None,
                role_keys: vec![],
                expires_at: None,
            },
        }));
    };

    let role_keys = InvitationRepo::role_keys(&state.pool, invitation.id).await?;

    Ok(Json(DataResponse {
        data: InvitationValidation {
            valid: true,
            email: Some(invitation.email),
            role_keys,
            expires_at: Some(invitation.expires_at),
        },
    }))
}

/// POST /invitations/accept
///
/// Public. Creates the user, grants the invitation's roles, and marks the
/// invitation accepted as one atomic unit.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(input): Json<AcceptRequest>,
) -> AppResult<impl IntoResponse> {
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if input.display_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "display_name must not be empty".into(),
        )));
    }

    let token_hash = hash_invitation_token(&input.token);
    let invitation = InvitationRepo::find_pending_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::InvalidInvitation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let create = CreateUser {
        email: invitation.email.clone(),
        display_name: input.display_name.trim().to_string(),
        password_hash,
    };

    let user = InvitationRepo::accept(&state.pool, invitation.id, &create)
        .await
        .map_err(|err| match err {
            // Lost the race against another accept of the same token.
            sqlx::Error::RowNotFound => AppError::InvalidInvitation,
            other => AppError::Database(other),
        })?;

    tracing::info!(
        invitation_id = %invitation.id,
        user_id = user.id,
        "Invitation accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InvitationAccepted {
                user_id: user.id,
                email: user.email,
            },
        }),
    ))
}
