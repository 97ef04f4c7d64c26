//! Document and document version models.

use orgst_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::tag::Tag;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub visibility: String,
    pub created_by: DbId,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `document_versions` table, including the body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVersion {
    pub id: DbId,
    pub document_id: DbId,
    pub version_number: i32,
    pub body_md: String,
    pub authored_by: DbId,
    pub created_at: Timestamp,
}

/// Version row without the body, for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVersionSummary {
    pub id: DbId,
    pub version_number: i32,
    pub authored_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a new document (with its initial version).
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    pub body_md: String,
    pub summary: Option<String>,
    /// Defaults to `community` when omitted.
    pub visibility: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub project_id: Option<DbId>,
}

/// Composable document listing filters. All provided filters AND together.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentFilters {
    /// Case-insensitive match against title or summary.
    pub text: Option<String>,
    /// Case-insensitive match against associated tag names.
    pub tag: Option<String>,
    /// Exact project association.
    pub project_id: Option<DbId>,
}

/// A document together with its resolved tags, as returned by the API.
#[derive(Debug, Serialize)]
pub struct DocumentWithTags {
    #[serde(flatten)]
    pub document: Document,
    pub tags: Vec<Tag>,
}
