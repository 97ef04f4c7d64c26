use orgst_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tags` table. Names are stored case-sensitively; filtering
/// is case-insensitive.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
}

/// A `(document_id, tag)` pair returned by the batch tag lookup.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentTagRow {
    pub document_id: DbId,
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
