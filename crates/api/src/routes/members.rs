//! Route definitions for the community directory and skill profiles.
//!
//! Merged at the API root (routes span `/members`, `/me`, and `/skills`).

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// ```text
/// GET   /members        list_members
/// GET   /members/{id}   get_member
/// PATCH /me/profile     patch_my_profile
/// PUT   /me/skills      set_my_skill
/// GET   /skills         list_skills
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(members::list_members))
        .route("/members/{id}", get(members::get_member))
        .route("/me/profile", patch(members::patch_my_profile))
        .route("/me/skills", put(members::set_my_skill))
        .route("/skills", get(members::list_skills))
}
