use orgst_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Invitation lifecycle states, as stored in `invitations.status`.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REVOKED: &str = "revoked";

/// A row from the `invitations` table. Only the token hash is stored.
#[derive(Debug, Clone, FromRow)]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub token_hash: String,
    pub status: String,
    pub invited_by: DbId,
    pub expires_at: Timestamp,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an invitation.
#[derive(Debug, Deserialize)]
pub struct CreateInvitation {
    pub email: String,
    pub role_keys: Vec<String>,
    /// Defaults to 7 when omitted.
    pub expires_in_days: Option<i64>,
}
