//! Repository for the `roles` and `user_roles` tables.
//!
//! The visibility evaluator consumes role keys resolved here; the decision
//! itself stays in `orgst_core::access`.

use orgst_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::role::Role;

const COLUMNS: &str = "id, key, name, created_at";

/// Provides role lookup and user-role assignment.
pub struct RoleRepo;

impl RoleRepo {
    /// All role keys held by a user.
    pub async fn keys_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.key FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = $1
             ORDER BY r.key",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Resolve role rows for a set of keys. Unknown keys are silently
    /// dropped; callers that need strictness compare lengths.
    pub async fn find_by_keys(pool: &PgPool, keys: &[String]) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE key = ANY($1) ORDER BY key");
        sqlx::query_as::<_, Role>(&query)
            .bind(keys)
            .fetch_all(pool)
            .await
    }

    /// Assign a role to a user. Idempotent.
    pub async fn assign<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        role_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Role keys for many users at once, for the member directory.
    pub async fn keys_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT ur.user_id, r.key FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = ANY($1)
             ORDER BY r.key",
        )
        .bind(user_ids)
        .fetch_all(pool)
        .await
    }
}
