//! Repository for the `tags` table.
//!
//! Tag names are stored case-sensitively; creation is idempotent per exact
//! name, and lookups used for filtering are case-insensitive.

use sqlx::PgExecutor;

use crate::models::tag::Tag;

const COLUMNS: &str = "id, name, created_at";

/// Provides idempotent get-or-create for tags.
pub struct TagRepo;

impl TagRepo {
    /// Return the tag with this exact name, creating it if absent.
    ///
    /// `ON CONFLICT ... DO UPDATE` so the existing row is returned on
    /// conflict (plain `DO NOTHING` returns no row).
    pub async fn get_or_create<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_one(executor)
            .await
    }

}
