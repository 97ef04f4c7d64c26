//! Repository for the `users` table.

use orgst_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list for users queries.
const COLUMNS: &str = "\
    id, email, username, display_name, password_hash, avatar_url, bio, \
    profession, location, github_url, linkedin_url, birth_date, \
    is_staff, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a new user. Takes any executor so invitation acceptance can
    /// run it inside its transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .fetch_one(executor)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email or username, case-insensitively. Used by login.
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1)"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// List active users for the member directory, alphabetically by
    /// display name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE is_active = TRUE ORDER BY display_name"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Patch a user's profile. `None` fields are left unchanged.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($1, display_name),
                avatar_url = COALESCE($2, avatar_url),
                bio = COALESCE($3, bio),
                profession = COALESCE($4, profession),
                location = COALESCE($5, location),
                github_url = COALESCE($6, github_url),
                linkedin_url = COALESCE($7, linkedin_url),
                birth_date = COALESCE($8, birth_date),
                updated_at = NOW()
             WHERE id = $9
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.display_name)
            .bind(&input.avatar_url)
            .bind(&input.bio)
            .bind(&input.profession)
            .bind(&input.location)
            .bind(&input.github_url)
            .bind(&input.linkedin_url)
            .bind(input.birth_date)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
