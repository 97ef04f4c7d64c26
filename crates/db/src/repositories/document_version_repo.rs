//! Repository for the `document_versions` table.
//!
//! Versions are immutable snapshots: created on document creation (v1) and
//! on appends, never updated or reordered. Uniqueness on
//! `(document_id, version_number)` backs the no-gaps-no-duplicates invariant.

use orgst_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::document::{DocumentVersion, DocumentVersionSummary};

/// Column list for document_versions queries.
const COLUMNS: &str = "id, document_id, version_number, body_md, authored_by, created_at";

/// Provides read and create operations for document versions.
pub struct DocumentVersionRepo;

impl DocumentVersionRepo {
    /// Insert a version snapshot. Takes any executor so callers can run it
    /// inside their own transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        document_id: DbId,
        version_number: i32,
        body_md: &str,
        authored_by: DbId,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_versions (document_id, version_number, body_md, authored_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(version_number)
            .bind(body_md)
            .bind(authored_by)
            .fetch_one(executor)
            .await
    }

    /// List version summaries for a document, newest first. The body is
    /// omitted to keep list payloads small.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<DocumentVersionSummary>, sqlx::Error> {
        sqlx::query_as::<_, DocumentVersionSummary>(
            "SELECT id, version_number, authored_by, created_at
             FROM document_versions
             WHERE document_id = $1
             ORDER BY version_number DESC",
        )
        .bind(document_id)
        .fetch_all(pool)
        .await
    }

    /// Latest version number for a document (0 if none exist).
    pub async fn latest_version_number<'e>(
        executor: impl PgExecutor<'e>,
        document_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(MAX(version_number), 0) FROM document_versions WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_one(executor)
        .await
    }
}
