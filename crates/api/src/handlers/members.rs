//! Handlers for the community directory: member cards, member detail,
//! profile patches, and skill profiles.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use orgst_core::error::CoreError;
use orgst_core::types::DbId;
use orgst_db::models::skill::{SetUserSkill, UserSkill};
use orgst_db::models::user::{MemberCard, UpdateProfile, User};
use orgst_db::repositories::{RoleRepo, SkillRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Response types
-------------------------------------------------------------------------- */

/// Full member profile, for the detail endpoint and `PATCH /me/profile`.
#[derive(Debug, Serialize)]
pub struct MemberDetail {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub profession: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub roles: Vec<String>,
    pub skills: Vec<UserSkill>,
}

impl MemberDetail {
    fn from_parts(user: User, roles: Vec<String>, skills: Vec<UserSkill>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            birth_date: user.birth_date,
            profession: user.profession,
            bio: user.bio,
            location: user.location,
            github_url: user.github_url,
            linkedin_url: user.linkedin_url,
            roles,
            skills,
        }
    }
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// GET /members
///
/// Compact cards for all active members, with role keys and plain skill
/// names for card display.
pub async fn list_members(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_active(&state.pool).await?;
    let ids: Vec<DbId> = users.iter().map(|u| u.id).collect();

    let mut roles_by_user: HashMap<DbId, Vec<String>> = HashMap::new();
    for (user_id, key) in RoleRepo::keys_for_users(&state.pool, &ids).await? {
        roles_by_user.entry(user_id).or_default().push(key);
    }
    let mut skills_by_user: HashMap<DbId, Vec<String>> = HashMap::new();
    for (user_id, name) in SkillRepo::skill_names_for_users(&state.pool, &ids).await? {
        skills_by_user.entry(user_id).or_default().push(name);
    }

    let cards: Vec<MemberCard> = users
        .into_iter()
        .map(|u| MemberCard {
            roles: roles_by_user.remove(&u.id).unwrap_or_default(),
            skills: skills_by_user.remove(&u.id).unwrap_or_default(),
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            avatar_url: u.avatar_url,
        })
        .collect();

    Ok(Json(DataResponse { data: cards }))
}

/// GET /members/{id}
pub async fn get_member(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = UserRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let roles = RoleRepo::keys_for_user(&state.pool, member.id).await?;
    let skills = SkillRepo::skills_for_user(&state.pool, member.id).await?;

    Ok(Json(DataResponse {
        data: MemberDetail::from_parts(member, roles, skills),
    }))
}

/// PATCH /me/profile
///
/// Partial update of the caller's own profile.
pub async fn patch_my_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.display_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "display_name must not be empty".into(),
            )));
        }
    }

    let updated = UserRepo::update_profile(&state.pool, user.user_id(), &input).await?;
    let roles = RoleRepo::keys_for_user(&state.pool, updated.id).await?;
    let skills = SkillRepo::skills_for_user(&state.pool, updated.id).await?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(DataResponse {
        data: MemberDetail::from_parts(updated, roles, skills),
    }))
}

/// PUT /me/skills
///
/// Upsert one entry in the caller's skill profile.
pub async fn set_my_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetUserSkill>,
) -> AppResult<impl IntoResponse> {
    if !(1..=5).contains(&input.level) {
        return Err(AppError::Core(CoreError::Validation(
            "level must be between 1 and 5".into(),
        )));
    }
    if input.years_exp < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "years_exp must not be negative".into(),
        )));
    }
    if SkillRepo::find_by_id(&state.pool, input.skill_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Skill",
            id: input.skill_id,
        }));
    }

    let skill = SkillRepo::set_user_skill(&state.pool, user.user_id(), &input).await?;
    Ok(Json(DataResponse { data: skill }))
}

/// GET /skills
///
/// The skill catalog, for the profile editor.
pub async fn list_skills(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let skills = SkillRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: skills }))
}
