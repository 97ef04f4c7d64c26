//! Route definitions for the invitation lifecycle, registered under
//! `/invitations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::invitations;
use crate::state::AppState;

/// ```text
/// POST /           create_invitation (staff or admin/cofounder)
/// GET  /validate   validate_invitation (public)
/// POST /accept     accept_invitation (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(invitations::create_invitation))
        .route("/validate", get(invitations::validate_invitation))
        .route("/accept", post(invitations::accept_invitation))
}
