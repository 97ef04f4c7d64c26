//! Handlers for the `/docs` resource: visibility-gated, versioned documents.
//!
//! Listing composes the storage-level filters with the per-document
//! visibility check; creation and version appends go through the atomic
//! repository operations.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use orgst_core::access::can_view;
use orgst_core::docs::{validate_body, validate_title, validate_visibility};
use orgst_core::error::CoreError;
use orgst_core::types::DbId;
use orgst_db::models::document::{
    CreateDocument, Document, DocumentFilters, DocumentWithTags,
};
use orgst_db::models::tag::Tag;
use orgst_db::repositories::{DocumentRepo, DocumentVersionRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Request types
-------------------------------------------------------------------------- */

#[derive(Debug, serde::Deserialize)]
pub struct CreateVersionRequest {
    pub body_md: String,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch a document by id or return 404.
async fn ensure_document(pool: &sqlx::PgPool, id: DbId) -> AppResult<Document> {
    DocumentRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        })
    })
}

/// 403 unless the authenticated principal may view the document.
fn ensure_visible(state: &AppState, user: &AuthUser, doc: &Document) -> AppResult<()> {
    if !can_view(
        Some(&user.principal),
        &doc.visibility,
        doc.created_by,
        &state.config.mentor_role_keys,
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may not view this document".into(),
        )));
    }
    Ok(())
}

/// Attach tags to a batch of documents, preserving the input order.
async fn with_tags(
    pool: &sqlx::PgPool,
    documents: Vec<Document>,
) -> AppResult<Vec<DocumentWithTags>> {
    let ids: Vec<DbId> = documents.iter().map(|d| d.id).collect();
    let rows = DocumentRepo::tags_for_documents(pool, &ids).await?;

    let mut by_doc: HashMap<DbId, Vec<Tag>> = HashMap::new();
    for row in rows {
        by_doc.entry(row.document_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        });
    }

    Ok(documents
        .into_iter()
        .map(|document| {
            let tags = by_doc.remove(&document.id).unwrap_or_default();
            DocumentWithTags { document, tags }
        })
        .collect())
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// GET /docs
///
/// List documents the caller may view, newest first. Storage applies the
/// text/tag/project filters; visibility is applied per document afterwards
/// without re-sorting.
pub async fn list_docs(
    user: AuthUser,
    State(state): State<AppState>,
    Query(filters): Query<DocumentFilters>,
) -> AppResult<impl IntoResponse> {
    let mut documents = DocumentRepo::list(&state.pool, &filters).await?;
    documents.retain(|d| {
        can_view(
            Some(&user.principal),
            &d.visibility,
            d.created_by,
            &state.config.mentor_role_keys,
        )
    });

    let docs = with_tags(&state.pool, documents).await?;
    Ok(Json(DataResponse { data: docs }))
}

/// POST /docs
///
/// Create a document and its initial version as one atomic unit.
pub async fn create_doc(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title).map_err(AppError::Core)?;
    validate_body(&input.body_md).map_err(AppError::Core)?;
    if let Some(ref visibility) = input.visibility {
        validate_visibility(visibility).map_err(AppError::Core)?;
    }
    if let Some(project_id) = input.project_id {
        if ProjectRepo::find_by_id(&state.pool, project_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown project id {project_id}"
            ))));
        }
    }

    let document = DocumentRepo::create(&state.pool, &input, user.user_id()).await?;

    tracing::info!(
        user_id = user.user_id(),
        document_id = document.id,
        slug = %document.slug,
        "Document created"
    );

    let mut docs = with_tags(&state.pool, vec![document]).await?;
    let doc = docs.remove(0);
    Ok((StatusCode::CREATED, Json(DataResponse { data: doc })))
}

/// GET /docs/{id}
///
/// Fetch a single document. 404 before the visibility check so missing and
/// forbidden are distinguishable.
pub async fn get_doc(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document(&state.pool, id).await?;
    ensure_visible(&state, &user, &document)?;

    let mut docs = with_tags(&state.pool, vec![document]).await?;
    let doc = docs.remove(0);
    Ok(Json(DataResponse { data: doc }))
}

/// GET /docs/{id}/versions
///
/// List version summaries (no body) for a document, newest first.
pub async fn list_versions(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document(&state.pool, id).await?;
    ensure_visible(&state, &user, &document)?;

    let versions = DocumentVersionRepo::list_by_document(&state.pool, document.id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /docs/{id}/versions
///
/// Append a new immutable version. The repository serializes concurrent
/// appends per document.
pub async fn add_version(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateVersionRequest>,
) -> AppResult<impl IntoResponse> {
    validate_body(&input.body_md).map_err(AppError::Core)?;

    let document = ensure_document(&state.pool, id).await?;
    ensure_visible(&state, &user, &document)?;

    let version =
        DocumentRepo::add_version(&state.pool, document.id, &input.body_md, user.user_id())
            .await?;

    tracing::info!(
        user_id = user.user_id(),
        document_id = document.id,
        version_number = version.version_number,
        "Document version added"
    );

    // Return the summary shape used by the list endpoint.
    let summary = orgst_db::models::document::DocumentVersionSummary {
        id: version.id,
        version_number: version.version_number,
        authored_by: version.authored_by,
        created_at: version.created_at,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}
