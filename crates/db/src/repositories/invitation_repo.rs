//! Repository for the `invitations` and `invitation_roles` tables.
//!
//! Invitations store only a SHA-256 token hash; the plaintext token exists
//! solely in the creation response.

use chrono::{Duration, Utc};
use orgst_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::invitation::{Invitation, STATUS_ACCEPTED, STATUS_PENDING};
use crate::models::user::{CreateUser, User};
use crate::repositories::role_repo::RoleRepo;
use crate::repositories::user_repo::UserRepo;

const COLUMNS: &str = "\
    id, email, token_hash, status, invited_by, expires_at, accepted_at, \
    created_at, updated_at";

/// Provides invitation creation, validation lookup, and acceptance.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Create an invitation with its role links in one transaction.
    ///
    /// `role_ids` must already be resolved from role keys by the caller.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        token_hash: &str,
        invited_by: DbId,
        role_ids: &[DbId],
        expires_in_days: i64,
    ) -> Result<Invitation, sqlx::Error> {
        let expires_at = Utc::now() + Duration::days(expires_in_days);

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO invitations (email, token_hash, invited_by, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let invitation = sqlx::query_as::<_, Invitation>(&query)
            .bind(email)
            .bind(token_hash)
            .bind(invited_by)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await?;

        for role_id in role_ids {
            sqlx::query(
                "INSERT INTO invitation_roles (invitation_id, role_id)
                 VALUES ($1, $2)
                 ON CONFLICT (invitation_id, role_id) DO NOTHING",
            )
            .bind(invitation.id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(invitation)
    }

    /// Find a pending, unexpired invitation by its token hash.
    pub async fn find_pending_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations
             WHERE token_hash = $1 AND status = $2 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(token_hash)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Role keys attached to an invitation.
    pub async fn role_keys(pool: &PgPool, invitation_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.key FROM invitation_roles ir
             JOIN roles r ON r.id = ir.role_id
             WHERE ir.invitation_id = $1
             ORDER BY r.key",
        )
        .bind(invitation_id)
        .fetch_all(pool)
        .await
    }

    /// Accept an invitation: create the user, grant the invitation's roles,
    /// and mark the invitation accepted, all in one transaction.
    ///
    /// The status update guards on `status = 'pending'` so a second accept
    /// racing on the same token loses and rolls back.
    pub async fn accept(
        pool: &PgPool,
        invitation_id: Uuid,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = UserRepo::create(&mut *tx, input).await?;

        let role_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT role_id FROM invitation_roles WHERE invitation_id = $1",
        )
        .bind(invitation_id)
        .fetch_all(&mut *tx)
        .await?;
        for role_id in role_ids {
            RoleRepo::assign(&mut *tx, user.id, role_id).await?;
        }

        let updated = sqlx::query(
            "UPDATE invitations
             SET status = $1, accepted_at = NOW(), updated_at = NOW()
             WHERE id = $2 AND status = $3",
        )
        .bind(STATUS_ACCEPTED)
        .bind(invitation_id)
        .bind(STATUS_PENDING)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;
        Ok(user)
    }
}
