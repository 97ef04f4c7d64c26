pub mod auth;
pub mod docs;
pub mod health;
pub mod invitations;
pub mod members;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/token                      issue access token (public)
///
/// /invitations                     create (staff or admin/cofounder)
/// /invitations/validate            validate token (public)
/// /invitations/accept              accept and create account (public)
///
/// /docs                            list, create
/// /docs/{id}                       get
/// /docs/{id}/versions              list versions, append version
///
/// /members                         member directory
/// /members/{id}                    member detail
/// /me/profile                      patch own profile
/// /me/skills                       upsert own skill
/// /skills                          skill catalog
///
/// /projects                        list, create
/// /projects/{id}                   get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Token issuance (public).
        .nest("/auth", auth::router())
        // Invitation lifecycle.
        .nest("/invitations", invitations::router())
        // Versioned, visibility-gated documents.
        .nest("/docs", docs::router())
        // Community directory and skill profiles.
        .merge(members::router())
        // Projects (documents link to these).
        .nest("/projects", projects::router())
}
