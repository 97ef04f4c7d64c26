//! Route definitions for the documents feature.
//!
//! Registered under `/docs`.

use axum::routing::get;
use axum::Router;

use crate::handlers::docs;
use crate::state::AppState;

/// Document routes, registered as `/docs`.
///
/// ```text
/// GET    /               list_docs (filters: text, tag, project_id)
/// POST   /               create_doc
/// GET    /{id}           get_doc
/// GET    /{id}/versions  list_versions
/// POST   /{id}/versions  add_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(docs::list_docs).post(docs::create_doc))
        .route("/{id}", get(docs::get_doc))
        .route(
            "/{id}/versions",
            get(docs::list_versions).post(docs::add_version),
        )
}
