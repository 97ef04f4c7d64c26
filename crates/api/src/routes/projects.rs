//! Route definitions for projects, registered under `/projects`.

use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// ```text
/// GET  /        list_projects
/// POST /        create_project
/// GET  /{id}    get_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route("/{id}", get(projects::get_project))
}
