//! Repository for the `documents` table.
//!
//! Owns the two multi-row mutations of the docs subsystem: atomic creation
//! (document + version 1 + tag associations) and serialized version append.

use orgst_core::docs::{generate_slug, slug_candidate};
use orgst_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::document::{CreateDocument, Document, DocumentFilters, DocumentVersion};
use crate::models::tag::DocumentTagRow;
use crate::repositories::document_version_repo::DocumentVersionRepo;
use crate::repositories::tag_repo::TagRepo;

/// Column list for documents queries.
const COLUMNS: &str =
    "id, title, slug, summary, visibility, created_by, project_id, created_at, updated_at";

/// Attempts before giving up when concurrent creations keep racing on the
/// same slug base. The unique constraint remains the ultimate guarantee.
const SLUG_RETRY_ATTEMPTS: u32 = 3;

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Create a document and its initial version (version_number = 1) as a
    /// single transaction.
    ///
    /// The slug is derived from the title and made unique by probing
    /// `base`, `base-2`, `base-3`, ... If another creation commits the same
    /// slug between the probe and the insert, the unique constraint fires
    /// and the whole transaction is retried with a fresh probe.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
        created_by: DbId,
    ) -> Result<Document, sqlx::Error> {
        let base = generate_slug(&input.title);

        let mut last_err = None;
        for _ in 0..SLUG_RETRY_ATTEMPTS {
            match Self::try_create(pool, input, created_by, &base).await {
                Ok(doc) => return Ok(doc),
                Err(err) if is_slug_conflict(&err) => {
                    tracing::debug!(base = %base, "Slug collision during create, retrying");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.expect("retry loop ran at least once"))
    }

    async fn try_create(
        pool: &PgPool,
        input: &CreateDocument,
        created_by: DbId,
        base: &str,
    ) -> Result<Document, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slug = Self::allocate_slug(&mut tx, base).await?;
        let visibility = input.visibility.as_deref().unwrap_or("community");

        let query = format!(
            "INSERT INTO documents (title, slug, summary, visibility, created_by, project_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(&input.title)
            .bind(&slug)
            .bind(&input.summary)
            .bind(visibility)
            .bind(created_by)
            .bind(input.project_id)
            .fetch_one(&mut *tx)
            .await?;

        DocumentVersionRepo::create(&mut *tx, document.id, 1, &input.body_md, created_by).await?;

        for name in &input.tags {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            let tag = TagRepo::get_or_create(&mut *tx, trimmed).await?;
            sqlx::query(
                "INSERT INTO document_tags (document_id, tag_id)
                 VALUES ($1, $2)
                 ON CONFLICT (document_id, tag_id) DO NOTHING",
            )
            .bind(document.id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(document)
    }

    /// Probe `base`, `base-2`, `base-3`, ... for the first slug not already
    /// taken. Each candidate is re-truncated to the maximum slug length
    /// before the existence check.
    async fn allocate_slug(
        tx: &mut Transaction<'_, Postgres>,
        base: &str,
    ) -> Result<String, sqlx::Error> {
        let mut i = 1;
        loop {
            let candidate = slug_candidate(base, i);
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM documents WHERE slug = $1)")
                    .bind(&candidate)
                    .fetch_one(&mut **tx)
                    .await?;
            if !taken {
                return Ok(candidate);
            }
            i += 1;
        }
    }

    /// Append a new version to a document.
    ///
    /// Takes a row lock on the document for the duration of the
    /// read-max-then-insert sequence, so two concurrent appends can never
    /// observe the same current maximum and collide on a version number.
    pub async fn add_version(
        pool: &PgPool,
        document_id: DbId,
        body_md: &str,
        authored_by: DbId,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
                .bind(document_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(sqlx::Error::RowNotFound);
        }

        let next = DocumentVersionRepo::latest_version_number(&mut *tx, document_id).await? + 1;
        let version =
            DocumentVersionRepo::create(&mut *tx, document_id, next, body_md, authored_by).await?;

        tx.commit().await?;
        Ok(version)
    }

    /// Find a document by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List documents, newest first, with composable filters.
    ///
    /// - `text` matches case-insensitively against title or summary, as a
    ///   literal substring (`%`/`_` in the input are not wildcards)
    /// - `tag` matches case-insensitively against associated tag names
    /// - `project_id` restricts to an exact project association
    ///
    /// Visibility is applied by the caller; this is storage-level filtering
    /// only.
    pub async fn list(
        pool: &PgPool,
        filters: &DocumentFilters,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let pattern = filters
            .text
            .as_ref()
            .map(|t| format!("%{}%", escape_like(t)));
        let query = format!(
            "SELECT {COLUMNS} FROM documents d
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR summary ILIKE $1)
               AND ($2::BIGINT IS NULL OR project_id = $2)
               AND ($3::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM document_tags dt
                    JOIN tags t ON t.id = dt.tag_id
                    WHERE dt.document_id = d.id AND LOWER(t.name) = LOWER($3)))
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&pattern)
            .bind(filters.project_id)
            .bind(&filters.tag)
            .fetch_all(pool)
            .await
    }

    /// Fetch the tags of many documents in one query, for response assembly.
    pub async fn tags_for_documents(
        pool: &PgPool,
        document_ids: &[DbId],
    ) -> Result<Vec<DocumentTagRow>, sqlx::Error> {
        sqlx::query_as::<_, DocumentTagRow>(
            "SELECT dt.document_id, t.id, t.name, t.created_at
             FROM document_tags dt
             JOIN tags t ON t.id = dt.tag_id
             WHERE dt.document_id = ANY($1)
             ORDER BY t.name",
        )
        .bind(document_ids)
        .fetch_all(pool)
        .await
    }
}

/// Escape LIKE/ILIKE metacharacters so filter text matches literally.
/// Postgres's default escape character is the backslash.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// True when the error is a unique violation on the document slug.
fn is_slug_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_documents_slug")
        }
        _ => false,
    }
}
